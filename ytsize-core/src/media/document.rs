//! Metadata document decoded from `yt-dlp -J` output.

use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::media::track::Track;
use crate::utils::coerce_seconds;

/// The tracks of one video plus its declared duration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataDocument {
    /// Declared duration in whole seconds; `None` when absent or not positive.
    pub duration_seconds: Option<u64>,
    pub tracks: Vec<Track>,
}

impl MetadataDocument {
    /// Decodes the JSON printed by `yt-dlp -J`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ParseFailure` when the text is not JSON or does not
    /// describe a video.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| CoreError::ParseFailure(format!("Failed to parse yt-dlp JSON: {e}")))?;
        Self::from_value(&root)
    }

    /// Builds a document from an already decoded JSON value.
    ///
    /// Playlist-like containers are unwrapped: the first entry with a
    /// non-empty `formats` list wins, otherwise the first entry.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::ParseFailure` when the value (or the chosen entry)
    /// is not a JSON object.
    pub fn from_value(root: &Value) -> CoreResult<Self> {
        let video = select_entry(root)?;

        let duration_seconds = video.get("duration").and_then(coerce_seconds);
        let tracks = video
            .get("formats")
            .and_then(Value::as_array)
            .map(|formats| formats.iter().filter_map(Track::from_value).collect())
            .unwrap_or_default();

        Ok(MetadataDocument {
            duration_seconds,
            tracks,
        })
    }

    /// Finds a track by its exact yt-dlp format id.
    #[must_use]
    pub fn track_by_id(&self, format_id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.format_id == format_id)
    }
}

fn select_entry(root: &Value) -> CoreResult<&Value> {
    if !root.is_object() {
        return Err(CoreError::ParseFailure(
            "yt-dlp metadata is not a JSON object".to_string(),
        ));
    }

    let entries = match root.get("entries").and_then(Value::as_array) {
        Some(entries) if !entries.is_empty() => entries,
        _ => return Ok(root),
    };

    let has_formats = |entry: &&Value| {
        entry
            .get("formats")
            .and_then(Value::as_array)
            .is_some_and(|formats| !formats.is_empty())
    };

    entries
        .iter()
        .find(has_formats)
        .or_else(|| entries.first().filter(|entry| entry.is_object()))
        .ok_or_else(|| {
            CoreError::ParseFailure("yt-dlp playlist entries carry no video metadata".to_string())
        })
}
