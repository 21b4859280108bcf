// ============================================================================
// ytsize-core/src/sizing.rs
// ============================================================================
//
// SIZE ESTIMATION: Byte Counts for a Single Track
//
// Turns one track into a byte count using, in order of precedence:
// 1. the exact size yt-dlp reported (`filesize`)
// 2. the approximate size yt-dlp reported (`filesize_approx`)
// 3. bitrate × duration, with the first positive of tbr, vbr, abr in kbps
//
// A track with none of these is a legitimate "unknown", not an error.

// ---- Internal crate imports ----
use crate::media::Track;

/// Where a size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSource {
    Exact,
    Approximate,
    /// Estimated from bitrate and duration.
    Bitrate,
}

/// A byte count together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    pub bytes: u64,
    pub source: SizeSource,
}

/// Estimates the download size of `track`.
///
/// The bitrate fallback needs a positive `duration_seconds`; bitrates are
/// decimal kilobits per second.
#[must_use]
pub fn estimate_track_size(track: &Track, duration_seconds: Option<u64>) -> Option<SizeEstimate> {
    if let Some(exact) = track.exact_size_bytes {
        return Some(SizeEstimate {
            bytes: exact.trunc() as u64,
            source: SizeSource::Exact,
        });
    }

    if let Some(approx) = track.approx_size_bytes {
        return Some(SizeEstimate {
            bytes: approx.trunc() as u64,
            source: SizeSource::Approximate,
        });
    }

    let kbps = [track.total_bitrate, track.video_bitrate, track.audio_bitrate]
        .into_iter()
        .flatten()
        .find(|rate| *rate > 0.0)?;
    let seconds = duration_seconds.filter(|d| *d > 0)?;

    Some(SizeEstimate {
        bytes: bytes_from_bitrate(kbps, seconds),
        source: SizeSource::Bitrate,
    })
}

/// Byte count only; see [`estimate_track_size`].
#[must_use]
pub fn track_size(track: &Track, duration_seconds: Option<u64>) -> Option<u64> {
    estimate_track_size(track, duration_seconds).map(|estimate| estimate.bytes)
}

/// `round(kbps * 1000 / 8 * seconds)`
#[must_use]
pub fn bytes_from_bitrate(kbps: f64, seconds: u64) -> u64 {
    (kbps * 1000.0 / 8.0 * seconds as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Track {
        Track {
            format_id: "398".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_exact_size_takes_precedence() {
        let t = Track {
            exact_size_bytes: Some(1_000_000.0),
            approx_size_bytes: Some(2_000_000.0),
            total_bitrate: Some(5000.0),
            ..track()
        };
        let estimate = estimate_track_size(&t, Some(180)).unwrap();
        assert_eq!(estimate.bytes, 1_000_000);
        assert_eq!(estimate.source, SizeSource::Exact);
    }

    #[test]
    fn test_fractional_sizes_are_truncated() {
        let t = Track {
            approx_size_bytes: Some(45_234_567.9),
            ..track()
        };
        let estimate = estimate_track_size(&t, None).unwrap();
        assert_eq!(estimate.bytes, 45_234_567);
        assert_eq!(estimate.source, SizeSource::Approximate);
    }

    #[test]
    fn test_bitrate_estimate() {
        let t = Track {
            total_bitrate: Some(2000.0),
            ..track()
        };
        assert_eq!(track_size(&t, Some(180)), Some(45_000_000));
        assert_eq!(
            estimate_track_size(&t, Some(180)).map(|e| e.source),
            Some(SizeSource::Bitrate)
        );
    }

    #[test]
    fn test_bitrate_priority_skips_non_positive_rates() {
        let t = Track {
            total_bitrate: Some(0.0),
            video_bitrate: Some(-3.0),
            audio_bitrate: Some(128.0),
            ..track()
        };
        assert_eq!(track_size(&t, Some(10)), Some(160_000));
    }

    #[test]
    fn test_estimate_rounds() {
        // 0.1 kbps over 1 second is 12.5 bytes
        assert_eq!(bytes_from_bitrate(0.1, 1), 13);
        assert_eq!(bytes_from_bitrate(129.478, 213), 3_447_352);
    }

    #[test]
    fn test_unknown_without_duration_or_rate() {
        let t = Track {
            total_bitrate: Some(2000.0),
            ..track()
        };
        assert_eq!(track_size(&t, None), None);
        assert_eq!(track_size(&t, Some(0)), None);
        assert_eq!(track_size(&track(), Some(180)), None);
    }
}
