// ytsize-host/src/cli.rs
//
// Defines the command-line argument structures using clap.
//
// Browsers launch native hosts with extra positional arguments (the calling
// extension's origin and, on Windows, a parent window handle). Those are
// accepted and ignored so the host starts no matter how it is invoked.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use ytsize_core::{CoreConfig, CoreConfigBuilder};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "ytsize: Native messaging host for video download size estimates",
    long_about = "Reads one size request from the browser extension on stdin, asks yt-dlp \
                  about the video and replies with per-resolution download sizes on stdout. \
                  Use --probe to query a URL by hand."
)]
pub struct Cli {
    /// Path to the yt-dlp executable (defaults to a bundled copy, then PATH)
    #[arg(long = "yt-dlp", value_name = "PATH", env = "YTSIZE_YT_DLP")]
    pub yt_dlp: Option<PathBuf>,

    /// Override the timeout, in seconds, for every yt-dlp invocation
    #[arg(
        long,
        value_name = "SECS",
        env = "YTSIZE_TIMEOUT",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    // --- Manual Probing ---
    /// Estimate sizes for URL and print them instead of serving the browser
    #[arg(long, value_name = "URL")]
    pub probe: Option<String>,

    /// Duration hint in seconds for --probe
    #[arg(long, value_name = "SECONDS", requires = "probe")]
    pub duration_hint: Option<u64>,

    /// Print the --probe result as the JSON response the extension receives
    #[arg(long, requires = "probe")]
    pub json: bool,

    /// Arguments passed by the browser (extension origin, parent window)
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub browser_args: Vec<String>,
}

impl Cli {
    /// Builds the core configuration from the command-line overrides.
    #[must_use]
    pub fn core_config(&self) -> CoreConfig {
        let mut builder = CoreConfigBuilder::new();
        if let Some(path) = &self.yt_dlp {
            builder = builder.yt_dlp_path(path.clone());
        }
        if let Some(secs) = self.timeout {
            builder = builder.all_timeouts(Duration::from_secs(secs));
        }
        builder.build()
    }
}
