// ============================================================================
// ytsize-core/src/external/command.rs
// ============================================================================
//
// COMMAND EXECUTION: Child Processes with a Hard Deadline
//
// Spawns a child with piped output, drains stdout and stderr on reader threads
// so a chatty child never blocks on a full pipe, and polls for exit until the
// deadline. A child still running at the deadline is killed.

// ---- Internal crate imports ----
use crate::error::CoreResult;

// ---- External crate imports ----
use log::{debug, warn};

// ---- Standard library imports ----
use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Output of a child that exited on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Exit code; `None` when the child was terminated by a signal.
    pub status_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Completed(CapturedOutput),
    /// The deadline passed and the child was killed.
    TimedOut,
    /// The executable does not exist.
    NotFound,
}

/// Runs `cmd` to completion or until `timeout` elapses.
///
/// # Errors
///
/// Returns `CoreError::Io` when the child cannot be spawned for a reason
/// other than a missing executable, or when polling it fails.
pub fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> CoreResult<CommandOutcome> {
    debug!("Running command: {:?}", cmd);

    let spawned = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Executable not found: {}", e);
            return Ok(CommandOutcome::NotFound);
        }
        Err(e) => return Err(e.into()),
    };

    let stdout_handle = child.stdout.take().map(drain);
    let stderr_handle = child.stderr.take().map(drain);

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            warn!("Command timed out after {} seconds; killing it", timeout.as_secs());
            let _ = child.kill();
            let _ = child.wait();
            // Reader threads are left to finish on their own: a grandchild may
            // still hold the pipes open.
            return Ok(CommandOutcome::TimedOut);
        }
        thread::sleep(POLL_INTERVAL);
    };

    let output = CapturedOutput {
        status_code: status.code(),
        stdout: collect(stdout_handle),
        stderr: collect(stderr_handle),
    };
    debug!(
        "Command exited with {:?} ({} bytes stdout, {} bytes stderr)",
        output.status_code,
        output.stdout.len(),
        output.stderr.len()
    );
    Ok(CommandOutcome::Completed(output))
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = reader.read_to_end(&mut buffer);
        buffer
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
