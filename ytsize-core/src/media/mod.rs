//! Media metadata model: tracks, documents and resolution targets.
//!
//! These types are read-only views of what yt-dlp reported. Nothing in the
//! engine mutates them.

pub mod document;
pub mod targets;
pub mod track;

pub use document::MetadataDocument;
pub use targets::{
    BEST_AUDIO_FORMAT_ID, CodecVariant, RESOLUTION_TARGETS, ResolutionTarget,
    known_format_ids,
};
pub use track::{Track, TrackKind};
