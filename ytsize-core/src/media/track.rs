//! Track model built from one entry of yt-dlp's `formats` array.

use serde::Deserialize;
use serde_json::Value;

use crate::utils::coerce_number;

/// What a track carries, inferred from which codec fields read `"none"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    VideoOnly,
    AudioOnly,
    /// Video and audio muxed together.
    Progressive,
}

/// One encoding variant of a video, as reported by yt-dlp.
///
/// Tracks are read-only views of the collaborator's data; numeric fields that
/// yt-dlp left out or filled with garbage are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub format_id: String,
    /// Lower-cased `vcodec`; `"none"` means the track has no video.
    pub video_codec: String,
    /// Lower-cased `acodec`; `"none"` means the track has no audio.
    pub audio_codec: String,
    pub height: Option<u32>,
    /// Lower-cased container extension (`webm`, `m4a`, `mp4`, ...).
    pub extension: String,
    pub fps: Option<f64>,
    /// Kilobits per second.
    pub total_bitrate: Option<f64>,
    pub video_bitrate: Option<f64>,
    pub audio_bitrate: Option<f64>,
    pub exact_size_bytes: Option<f64>,
    pub approx_size_bytes: Option<f64>,
}

/// Field-for-field mirror of a yt-dlp format object. Every field stays a raw
/// JSON value so that one malformed number does not reject the whole track.
#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    format_id: Option<Value>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    height: Option<Value>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    fps: Option<Value>,
    #[serde(default)]
    tbr: Option<Value>,
    #[serde(default)]
    vbr: Option<Value>,
    #[serde(default)]
    abr: Option<Value>,
    #[serde(default)]
    filesize: Option<Value>,
    #[serde(default)]
    filesize_approx: Option<Value>,
}

impl Track {
    /// Builds a track from a yt-dlp format object. Non-objects yield `None`.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let raw: RawFormat = serde_json::from_value(value.clone()).ok()?;
        Some(Self::from(raw))
    }

    /// Whether the track carries a video stream. A missing `vcodec` counts as
    /// present; only an explicit `"none"` rules video out.
    #[must_use]
    pub fn has_video(&self) -> bool {
        self.video_codec != "none"
    }

    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio_codec != "none"
    }

    /// Media kind, or `None` for tracks carrying neither stream (storyboards).
    #[must_use]
    pub fn kind(&self) -> Option<TrackKind> {
        match (self.has_video(), self.has_audio()) {
            (true, false) => Some(TrackKind::VideoOnly),
            (false, true) => Some(TrackKind::AudioOnly),
            (true, true) => Some(TrackKind::Progressive),
            (false, false) => None,
        }
    }
}

impl From<RawFormat> for Track {
    fn from(raw: RawFormat) -> Self {
        let format_id = match raw.format_id {
            Some(Value::String(id)) => id,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        // Heights must be whole positive integers; 720.5 or "720" are not heights.
        let height = raw
            .height
            .as_ref()
            .and_then(Value::as_u64)
            .filter(|h| *h > 0)
            .and_then(|h| u32::try_from(h).ok());
        let number = |v: &Option<Value>| v.as_ref().and_then(coerce_number);
        // Sizes are only trusted when yt-dlp emitted an actual JSON number.
        let size = |v: &Option<Value>| {
            v.as_ref()
                .and_then(Value::as_f64)
                .filter(|s| s.is_finite() && *s >= 0.0)
        };

        Track {
            format_id,
            video_codec: raw.vcodec.unwrap_or_default().to_ascii_lowercase(),
            audio_codec: raw.acodec.unwrap_or_default().to_ascii_lowercase(),
            height,
            extension: raw.ext.unwrap_or_default().to_ascii_lowercase(),
            fps: number(&raw.fps),
            total_bitrate: number(&raw.tbr),
            video_bitrate: number(&raw.vbr),
            audio_bitrate: number(&raw.abr),
            exact_size_bytes: size(&raw.filesize),
            approx_size_bytes: size(&raw.filesize_approx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_format_fields() {
        let track = Track::from_value(&json!({
            "format_id": "398",
            "vcodec": "av01.0.05M.08",
            "acodec": "none",
            "height": 720,
            "ext": "MP4",
            "fps": 30,
            "tbr": "2000.5",
            "filesize": 40000000,
            "filesize_approx": null
        }))
        .unwrap();

        assert_eq!(track.format_id, "398");
        assert_eq!(track.kind(), Some(TrackKind::VideoOnly));
        assert_eq!(track.height, Some(720));
        assert_eq!(track.extension, "mp4");
        assert_eq!(track.total_bitrate, Some(2000.5));
        assert_eq!(track.exact_size_bytes, Some(40_000_000.0));
        assert_eq!(track.approx_size_bytes, None);
    }

    #[test]
    fn test_kind_inference() {
        let audio = Track::from_value(&json!({"vcodec": "none", "acodec": "opus"})).unwrap();
        assert_eq!(audio.kind(), Some(TrackKind::AudioOnly));

        let muxed = Track::from_value(&json!({"vcodec": "avc1", "acodec": "mp4a.40.2"})).unwrap();
        assert_eq!(muxed.kind(), Some(TrackKind::Progressive));

        let storyboard = Track::from_value(&json!({"vcodec": "none", "acodec": "NONE"})).unwrap();
        assert_eq!(storyboard.kind(), None);

        // Missing codec fields are not "none"
        let unknown = Track::from_value(&json!({"acodec": "none"})).unwrap();
        assert_eq!(unknown.kind(), Some(TrackKind::VideoOnly));
    }

    #[test]
    fn test_numeric_format_id_and_bad_values() {
        let track = Track::from_value(&json!({
            "format_id": 18,
            "height": -1,
            "filesize": "1234",
            "tbr": "n/a"
        }))
        .unwrap();
        assert_eq!(track.format_id, "18");
        assert_eq!(track.height, None);
        assert_eq!(track.exact_size_bytes, None);
        assert_eq!(track.total_bitrate, None);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Track::from_value(&json!("398")).is_none());
        assert!(Track::from_value(&json!(null)).is_none());
    }
}
