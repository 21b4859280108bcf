// ============================================================================
// ytsize-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the ytsize Core Library
//
// This module defines the error taxonomy shared by the resolution engine, the
// yt-dlp executor and the native messaging host. The Display text of the
// tool-related variants is exactly what the browser extension shows, so the
// messages are kept short and user-facing.
//
// KEY COMPONENTS:
// - CoreError: every failure the library can report
// - CoreResult: result alias used across the workspace
// - truncate_message: bounds captured tool output before it is reported

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;

/// Errors reported by ytsize-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The external tool could not be launched (collaborator status 127).
    #[error("{0}")]
    ToolNotFound(String),

    /// The external tool exceeded its deadline (collaborator status 124).
    #[error("{0}")]
    ToolTimeout(String),

    /// The external tool ran but exited with a non-zero status.
    #[error("{message}")]
    ToolFailure { code: i32, message: String },

    /// The tool reported success but its payload could not be decoded.
    #[error("{0}")]
    ParseFailure(String),

    /// Neither the structured nor the textual path produced a single size.
    #[error("{0}")]
    NoSizeDeterminable(String),

    #[error("Invalid or unsafe YouTube URL")]
    InvalidUrl(String),

    #[error("Native messaging protocol error: {0}")]
    Protocol(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for ytsize-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Whether this error means the tool itself is missing.
    #[must_use]
    pub fn is_tool_not_found(&self) -> bool {
        matches!(self, CoreError::ToolNotFound(_))
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::ToolTimeout(_))
    }
}

/// Cuts `message` down to at most `max_chars` characters.
///
/// Counts characters rather than bytes so multi-byte stderr output is never
/// split inside a code point.
#[must_use]
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => message[..idx].to_string(),
        None => message.to_string(),
    }
}
