// ============================================================================
// ytsize-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig starting from the library defaults. The
// host binary feeds command-line and environment overrides through it.

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::CoreConfig;

/// Builder for creating CoreConfig instances.
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    config: CoreConfig,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit yt-dlp executable.
    #[must_use]
    pub fn yt_dlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.yt_dlp_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn metadata_timeout(mut self, timeout: Duration) -> Self {
        self.config.metadata_timeout = timeout;
        self
    }

    #[must_use]
    pub fn format_list_timeout(mut self, timeout: Duration) -> Self {
        self.config.format_list_timeout = timeout;
        self
    }

    #[must_use]
    pub fn duration_timeout(mut self, timeout: Duration) -> Self {
        self.config.duration_timeout = timeout;
        self
    }

    /// Applies one deadline to all three yt-dlp invocation modes.
    #[must_use]
    pub fn all_timeouts(self, timeout: Duration) -> Self {
        self.metadata_timeout(timeout)
            .format_list_timeout(timeout)
            .duration_timeout(timeout)
    }

    #[must_use]
    pub fn max_error_len(mut self, max_chars: usize) -> Self {
        self.config.max_error_len = max_chars;
        self
    }

    /// Builds the configuration. Call `CoreConfig::validate` before use.
    #[must_use]
    pub fn build(self) -> CoreConfig {
        self.config
    }
}
