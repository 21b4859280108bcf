// ============================================================================
// ytsize-core/src/external/ytdlp_executor.rs
// ============================================================================
//
// YT-DLP EXECUTION: Process-Backed MediaInspector
//
// Runs yt-dlp in its three invocation modes and converts each run into a
// ToolOutcome. The URL is always placed after `--` so it can never be read
// as an option.
//
//   metadata:  yt-dlp -J -s --no-playlist -- <url>
//   listing:   yt-dlp -F --no-playlist -- <url>
//   duration:  yt-dlp --print %(duration)s -s --no-playlist -- <url>

// ---- Internal crate imports ----
use super::command::{CommandOutcome, run_with_timeout};
use super::{MediaInspector, ToolOutcome};
use crate::config::CoreConfig;
use crate::utils::positive_seconds;

// ---- External crate imports ----
use log::{debug, info, warn};

// ---- Standard library imports ----
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

const METADATA_ARGS: &[&str] = &["-J", "-s", "--no-playlist"];
const LIST_FORMATS_ARGS: &[&str] = &["-F", "--no-playlist"];
const DURATION_ARGS: &[&str] = &["--print", "%(duration)s", "-s", "--no-playlist"];

/// Picks the yt-dlp executable to run.
///
/// Search order: `configured`, then a `yt-dlp` (or `yt-dlp.exe` on Windows)
/// shipped next to the running executable, then plain `yt-dlp` resolved
/// through `PATH` at spawn time.
#[must_use]
pub fn locate_yt_dlp(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }

    let bundled_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.canonicalize().ok())
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(dir) = bundled_dir {
        if let Some(found) = bundled_candidates(&dir).into_iter().find(|c| c.is_file()) {
            debug!("Using bundled yt-dlp at {}", found.display());
            return found;
        }
    }

    PathBuf::from("yt-dlp")
}

fn bundled_candidates(dir: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if cfg!(windows) {
        candidates.push(dir.join("yt-dlp.exe"));
    }
    candidates.push(dir.join("yt-dlp"));
    candidates
}

/// MediaInspector that shells out to yt-dlp.
#[derive(Debug, Clone)]
pub struct YtDlpExecutor {
    program: PathBuf,
    metadata_timeout: Duration,
    format_list_timeout: Duration,
    duration_timeout: Duration,
}

impl YtDlpExecutor {
    #[must_use]
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            program: locate_yt_dlp(config.yt_dlp_path.as_deref()),
            metadata_timeout: config.metadata_timeout,
            format_list_timeout: config.format_list_timeout,
            duration_timeout: config.duration_timeout,
        }
    }

    /// Executor for an explicit program with default timeouts.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        let config = CoreConfig {
            yt_dlp_path: Some(program.into()),
            ..CoreConfig::default()
        };
        Self::new(&config)
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs one yt-dlp mode. On a non-zero exit, stdout is still returned as
    /// the payload together with the trimmed stderr.
    fn run(&self, mode: &str, args: &[&str], url: &str, timeout: Duration) -> ToolOutcome<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args).arg("--").arg(url);
        info!("Running yt-dlp {} for {}", mode, url);

        let outcome = match run_with_timeout(&mut cmd, timeout) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Failed to run {}: {}", self.program.display(), e);
                return ToolOutcome::failure(1, format!("Failed to run yt-dlp: {e}"));
            }
        };

        match outcome {
            CommandOutcome::NotFound => {
                warn!("yt-dlp not found at {}", self.program.display());
                ToolOutcome::not_found()
            }
            CommandOutcome::TimedOut => {
                ToolOutcome::timed_out(format!("yt-dlp timed out while {mode}."))
            }
            CommandOutcome::Completed(output) if output.success() => {
                debug!("yt-dlp {} returned {} bytes", mode, output.stdout.len());
                ToolOutcome::success(Some(output.stdout))
            }
            CommandOutcome::Completed(output) => {
                let code = output.status_code.unwrap_or(-1);
                let stderr = output.stderr.trim();
                let message = if stderr.is_empty() {
                    format!("yt-dlp exited with code {code}")
                } else {
                    stderr.to_string()
                };
                warn!("yt-dlp {} failed with code {}: {}", mode, code, message);
                ToolOutcome {
                    payload: Some(output.stdout),
                    error: Some(message),
                    code,
                }
            }
        }
    }
}

impl MediaInspector for YtDlpExecutor {
    fn dump_metadata(&self, url: &str) -> ToolOutcome<String> {
        let mut outcome = self.run("fetching metadata", METADATA_ARGS, url, self.metadata_timeout);
        if !outcome.is_success() {
            outcome.payload = None;
        }
        outcome
    }

    fn list_formats(&self, url: &str) -> ToolOutcome<String> {
        self.run("listing formats", LIST_FORMATS_ARGS, url, self.format_list_timeout)
    }

    fn fetch_duration(&self, url: &str) -> ToolOutcome<u64> {
        let outcome = self.run("fetching duration", DURATION_ARGS, url, self.duration_timeout);
        if !outcome.is_success() {
            return ToolOutcome {
                payload: None,
                error: outcome.error,
                code: outcome.code,
            };
        }
        // yt-dlp prints "NA" (or nothing) when the duration is unknown
        let seconds = outcome
            .payload
            .as_deref()
            .map(str::trim)
            .and_then(|text| text.parse::<f64>().ok())
            .and_then(positive_seconds);
        ToolOutcome::success(seconds)
    }
}
