// ============================================================================
// ytsize-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with yt-dlp
//
// This module encapsulates every call to the external media-inspection tool.
// The engine only sees the MediaInspector trait, so tests swap the real
// process runner for a scripted mock.
//
// KEY COMPONENTS:
// - MediaInspector: the three yt-dlp invocation modes
// - ToolOutcome: payload / error / status code triple returned by each call
// - YtDlpExecutor: the process-backed implementation
// - run_with_timeout: child process runner with a hard deadline
//
// STATUS CODES:
// 0 is success, 124 a timeout, 127 a missing executable; anything else is a
// failure reported by yt-dlp itself.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Child process execution with timeouts
pub mod command;

/// yt-dlp backed MediaInspector
pub mod ytdlp_executor;

/// Scripted MediaInspector for tests
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use command::{CapturedOutput, CommandOutcome, run_with_timeout};
pub use ytdlp_executor::{YtDlpExecutor, locate_yt_dlp};

#[cfg(any(test, feature = "test-mocks"))]
pub use mocks::{InspectorCall, MockInspector};

// ============================================================================
// STATUS CODES AND MESSAGES
// ============================================================================

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_TIMEOUT: i32 = 124;
pub const EXIT_NOT_FOUND: i32 = 127;

pub const TOOL_NOT_FOUND_MESSAGE: &str = "yt-dlp not found in PATH. Please install yt-dlp.";
pub const TOOL_TIMEOUT_MESSAGE: &str = "yt-dlp timed out while fetching data.";

// ============================================================================
// TOOL OUTCOME
// ============================================================================

/// Result of one collaborator call.
///
/// `payload` may be present even on failure (yt-dlp sometimes prints a
/// partial listing before exiting non-zero); callers decide whether to use it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome<T> {
    pub payload: Option<T>,
    pub error: Option<String>,
    pub code: i32,
}

impl<T> ToolOutcome<T> {
    #[must_use]
    pub fn success(payload: Option<T>) -> Self {
        Self {
            payload,
            error: None,
            code: EXIT_SUCCESS,
        }
    }

    #[must_use]
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            payload: None,
            error: Some(message.into()),
            code,
        }
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::failure(EXIT_NOT_FOUND, TOOL_NOT_FOUND_MESSAGE)
    }

    #[must_use]
    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::failure(EXIT_TIMEOUT, message)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == EXIT_SUCCESS
    }

    /// Maps the status code onto the error taxonomy.
    ///
    /// # Errors
    ///
    /// `ToolTimeout` for 124, `ToolNotFound` for 127 and `ToolFailure` for any
    /// other non-zero code.
    pub fn into_result(self) -> CoreResult<Option<T>> {
        match self.code {
            EXIT_SUCCESS => Ok(self.payload),
            EXIT_TIMEOUT => Err(CoreError::ToolTimeout(
                self.error.unwrap_or_else(|| TOOL_TIMEOUT_MESSAGE.to_string()),
            )),
            EXIT_NOT_FOUND => Err(CoreError::ToolNotFound(
                self.error.unwrap_or_else(|| TOOL_NOT_FOUND_MESSAGE.to_string()),
            )),
            code => Err(CoreError::ToolFailure {
                code,
                message: self
                    .error
                    .unwrap_or_else(|| format!("yt-dlp exited with code {code}")),
            }),
        }
    }
}

// ============================================================================
// MEDIA INSPECTOR
// ============================================================================

/// The external media-inspection tool, seen from the engine.
pub trait MediaInspector {
    /// Structured metadata (`yt-dlp -J`) as raw JSON text.
    fn dump_metadata(&self, url: &str) -> ToolOutcome<String>;

    /// Tabular format listing (`yt-dlp -F`) as plain text.
    fn list_formats(&self, url: &str) -> ToolOutcome<String>;

    /// Duration in whole seconds. A successful call may carry no payload.
    fn fetch_duration(&self, url: &str) -> ToolOutcome<u64>;
}
