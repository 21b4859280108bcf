//! Configuration structures and constants for the ytsize-core library.
//!
//! This module controls how yt-dlp is located and how long each of its
//! invocation modes may run before it is killed.

mod builder;

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

pub use builder::CoreConfigBuilder;

// Default constants

/// Deadline for `yt-dlp -J` (structured metadata dump).
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(25);

/// Deadline for `yt-dlp -F` (textual format listing).
pub const DEFAULT_FORMAT_LIST_TIMEOUT: Duration = Duration::from_secs(25);

/// Deadline for the duration-only query.
pub const DEFAULT_DURATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Upper bound, in characters, on each captured yt-dlp error message.
pub const DEFAULT_MAX_ERROR_LEN: usize = 300;

/// Main configuration structure for the ytsize-core library.
///
/// Every field has a default, so `CoreConfig::default()` is a working
/// configuration that finds yt-dlp next to the host executable or on `PATH`.
///
/// # Examples
///
/// ```rust
/// use ytsize_core::config::CoreConfigBuilder;
/// use std::time::Duration;
///
/// let config = CoreConfigBuilder::new()
///     .yt_dlp_path("/usr/local/bin/yt-dlp")
///     .metadata_timeout(Duration::from_secs(40))
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Explicit yt-dlp executable; `None` means auto-detect
    pub yt_dlp_path: Option<PathBuf>,

    pub metadata_timeout: Duration,

    pub format_list_timeout: Duration,

    pub duration_timeout: Duration,

    /// Maximum characters kept from each yt-dlp error message
    pub max_error_len: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: None,
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
            format_list_timeout: DEFAULT_FORMAT_LIST_TIMEOUT,
            duration_timeout: DEFAULT_DURATION_TIMEOUT,
            max_error_len: DEFAULT_MAX_ERROR_LEN,
        }
    }
}

impl CoreConfig {
    /// Checks that every limit is usable.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Config` when a timeout or the error length is zero,
    /// or when the configured yt-dlp path is empty.
    pub fn validate(&self) -> CoreResult<()> {
        let timeouts = [
            ("metadata_timeout", self.metadata_timeout),
            ("format_list_timeout", self.format_list_timeout),
            ("duration_timeout", self.duration_timeout),
        ];
        for (name, timeout) in timeouts {
            if timeout.is_zero() {
                return Err(CoreError::Config(format!("{name} must be greater than zero")));
            }
        }

        if self.max_error_len == 0 {
            return Err(CoreError::Config(
                "max_error_len must be greater than zero".to_string(),
            ));
        }

        if self
            .yt_dlp_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(CoreError::Config("yt_dlp_path must not be empty".to_string()));
        }

        Ok(())
    }
}
