//! Core library for estimating video download sizes from yt-dlp metadata.
//!
//! This crate decodes yt-dlp's format metadata, picks the best video and audio
//! track for each standard resolution and reports their combined byte sizes,
//! falling back to the textual format listing when the metadata is unusable.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use ytsize_core::{CoreConfig, LogSink, SizeProbe, YtDlpExecutor, validate_video_url};
//!
//! let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
//! validate_video_url(url).unwrap();
//!
//! let config = CoreConfig::default();
//! let executor = YtDlpExecutor::new(&config);
//! let report = SizeProbe::new(&executor, &LogSink)
//!     .with_max_error_len(config.max_error_len)
//!     .run(url, Some(212))
//!     .unwrap();
//!
//! println!("720p: {}", report.human("s720p"));
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod external;
pub mod format_list;
pub mod media;
pub mod probe;
pub mod report;
pub mod resolver;
pub mod selection;
pub mod sizing;
pub mod url_guard;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use diagnostics::{DiagnosticSink, LogSink, MemorySink, NullSink};
pub use error::{CoreError, CoreResult};
pub use external::{MediaInspector, ToolOutcome, YtDlpExecutor};
pub use format_list::FormatListSizes;
pub use media::{MetadataDocument, Track, TrackKind};
pub use probe::SizeProbe;
pub use report::SizeReport;
pub use resolver::{ResolvedSizes, resolve, resolve_format_list};
pub use selection::{TrackQuery, select, select_track};
pub use sizing::{estimate_track_size, track_size};
pub use url_guard::validate_video_url;
pub use utils::{coerce_seconds, format_bytes, format_duration};
