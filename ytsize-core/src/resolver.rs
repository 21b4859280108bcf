// ============================================================================
// ytsize-core/src/resolver.rs
// ============================================================================
//
// SIZE RESOLUTION: Per-Resolution Sizes from yt-dlp Metadata
//
// This module orchestrates track selection and size estimation across every
// resolution target, producing video-only, combined and codec-variant sizes
// plus the single shared audio size.
//
// PER TARGET:
// 1. Canonical format id with a determinable size (authoritative)
// 2. Otherwise the best video-only track near the target height
// 3. Combined = video + shared audio when both are known
// 4. Otherwise the best progressive track's own size
//
// Codec variants at 1080p and 1440p are looked up by their own format id
// only; the canonical id reuses the target's video size. Each is combined
// with the same shared audio. Sums that overflow are unknown.
//
// The textual fallback (resolve_format_list) has no selection step: every
// value is looked up by id and combined sizes are plain sums.

// ---- Internal crate imports ----
use crate::diagnostics::DiagnosticSink;
use crate::format_list::FormatListSizes;
use crate::media::{
    BEST_AUDIO_FORMAT_ID, CodecVariant, MetadataDocument, RESOLUTION_TARGETS, ResolutionTarget,
    Track, TrackKind,
};
use crate::selection::{TrackQuery, select};
use crate::sizing::estimate_track_size;

/// Sizes for one codec variant at a multi-codec height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSizes {
    pub variant: CodecVariant,
    pub video: Option<u64>,
    /// Variant video plus shared audio.
    pub combined: Option<u64>,
}

/// Sizes for one resolution target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionSizes {
    pub target: ResolutionTarget,
    pub video: Option<u64>,
    /// Video plus audio, or a progressive track's own size.
    pub combined: Option<u64>,
    pub variants: Vec<VariantSizes>,
}

/// Everything the engine resolved for one video. Every field may be unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSizes {
    /// One entry per target, lowest resolution first.
    pub resolutions: Vec<ResolutionSizes>,
    /// Shared audio size.
    pub audio: Option<u64>,
    pub duration_seconds: Option<u64>,
}

impl ResolvedSizes {
    /// A result with every size unknown.
    #[must_use]
    pub fn empty(duration_seconds: Option<u64>) -> Self {
        let resolutions = RESOLUTION_TARGETS
            .iter()
            .map(|target| ResolutionSizes {
                target: *target,
                video: None,
                combined: None,
                variants: target
                    .variants
                    .iter()
                    .map(|variant| VariantSizes {
                        variant: *variant,
                        video: None,
                        combined: None,
                    })
                    .collect(),
            })
            .collect();
        Self {
            resolutions,
            audio: None,
            duration_seconds,
        }
    }

    /// Whether every resolution's combined size is unknown.
    #[must_use]
    pub fn resolutions_unknown(&self) -> bool {
        self.resolutions.iter().all(|r| r.combined.is_none())
    }

    /// Whether any resolution or codec variant has a combined size.
    #[must_use]
    pub fn has_any_combined(&self) -> bool {
        self.resolutions
            .iter()
            .any(|r| r.combined.is_some() || r.variants.iter().any(|v| v.combined.is_some()))
    }

    /// Sizes for the target at `height`.
    #[must_use]
    pub fn at_height(&self, height: u32) -> Option<&ResolutionSizes> {
        self.resolutions.iter().find(|r| r.target.height == height)
    }
}

/// Resolves every target from a decoded metadata document.
///
/// The document's own duration wins; `duration_hint` is only used when the
/// document has none and must be positive.
pub fn resolve(
    document: &MetadataDocument,
    duration_hint: Option<u64>,
    sink: &dyn DiagnosticSink,
) -> ResolvedSizes {
    let duration = document
        .duration_seconds
        .or(duration_hint.filter(|d| *d > 0));
    sink.trace(&format!(
        "resolving {} tracks, duration={:?}",
        document.tracks.len(),
        duration
    ));

    let resolver = DocumentResolver {
        document,
        duration,
        sink,
    };
    let audio = resolver.audio_size();

    let resolutions = RESOLUTION_TARGETS
        .iter()
        .map(|target| resolver.resolve_target(target, audio))
        .collect();

    ResolvedSizes {
        resolutions,
        audio,
        duration_seconds: duration,
    }
}

/// Recomputes every size from a parsed `yt-dlp -F` listing.
#[must_use]
pub fn resolve_format_list(sizes: &FormatListSizes, duration_seconds: Option<u64>) -> ResolvedSizes {
    let audio = sizes.get(BEST_AUDIO_FORMAT_ID);
    let add_audio = |video: Option<u64>| combined_size(video, audio);

    let resolutions = RESOLUTION_TARGETS
        .iter()
        .map(|target| {
            let video = sizes.get(target.format_id);
            ResolutionSizes {
                target: *target,
                video,
                combined: add_audio(video),
                variants: target
                    .variants
                    .iter()
                    .map(|variant| {
                        let video = sizes.get(variant.format_id);
                        VariantSizes {
                            variant: *variant,
                            video,
                            combined: add_audio(video),
                        }
                    })
                    .collect(),
            }
        })
        .collect();

    ResolvedSizes {
        resolutions,
        audio,
        duration_seconds,
    }
}

/// Video plus audio, or `None` when either is unknown or the sum overflows.
fn combined_size(video: Option<u64>, audio: Option<u64>) -> Option<u64> {
    video.zip(audio).and_then(|(v, a)| v.checked_add(a))
}

struct DocumentResolver<'a> {
    document: &'a MetadataDocument,
    duration: Option<u64>,
    sink: &'a dyn DiagnosticSink,
}

impl DocumentResolver<'_> {
    fn size_of(&self, track: &Track) -> Option<u64> {
        estimate_track_size(track, self.duration).map(|estimate| {
            self.sink.trace(&format!(
                "format {}: {} bytes ({:?})",
                track.format_id, estimate.bytes, estimate.source
            ));
            estimate.bytes
        })
    }

    /// Canonical id first; falls through when the id is absent or unsized.
    fn sized_by_id(&self, format_id: &str) -> Option<u64> {
        let size = self
            .document
            .track_by_id(format_id)
            .and_then(|track| self.size_of(track));
        if size.is_none() {
            self.sink
                .trace(&format!("format {format_id}: no sized track with this id"));
        }
        size
    }

    fn sized_by_query(&self, query: &TrackQuery) -> Option<u64> {
        let Some(track) = select(&self.document.tracks, query, self.duration) else {
            self.sink.trace(&format!("no candidate for {query:?}"));
            return None;
        };
        self.sink.trace(&format!(
            "picked format {} ({:?}, height {:?}) for {:?}",
            track.format_id, query.kind, track.height, query.target_height
        ));
        self.size_of(track)
    }

    fn audio_size(&self) -> Option<u64> {
        self.sized_by_id(BEST_AUDIO_FORMAT_ID)
            .or_else(|| self.sized_by_query(&TrackQuery::audio()))
    }

    fn resolve_target(&self, target: &ResolutionTarget, audio: Option<u64>) -> ResolutionSizes {
        let video = self.sized_by_id(target.format_id).or_else(|| {
            self.sized_by_query(&TrackQuery::at_height(TrackKind::VideoOnly, target.height))
        });

        let combined = combined_size(video, audio).or_else(|| {
            self.sized_by_query(&TrackQuery::at_height(TrackKind::Progressive, target.height))
        });

        let variants = target
            .variants
            .iter()
            .map(|variant| {
                // Only the canonical id may stand in for itself; other variant
                // ids are reported when yt-dlp lists exactly that id.
                let variant_video = if variant.format_id == target.format_id {
                    video
                } else {
                    self.sized_by_id(variant.format_id)
                };
                VariantSizes {
                    variant: *variant,
                    video: variant_video,
                    combined: combined_size(variant_video, audio),
                }
            })
            .collect();

        self.sink.trace(&format!(
            "{}p: video={video:?} combined={combined:?}",
            target.height
        ));

        ResolutionSizes {
            target: *target,
            video,
            combined,
            variants,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemorySink, NullSink};

    fn track(id: &str, vcodec: &str, acodec: &str, height: Option<u32>) -> Track {
        Track {
            format_id: id.into(),
            video_codec: vcodec.into(),
            audio_codec: acodec.into(),
            height,
            extension: "webm".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_canonical_id_beats_height_search() {
        let mut canonical = track("398", "av01.0.05m.08", "none", Some(720));
        canonical.exact_size_bytes = Some(10.0);
        let mut bigger = track("247", "vp9", "none", Some(720));
        bigger.exact_size_bytes = Some(99.0);
        bigger.total_bitrate = Some(9000.0);
        let doc = MetadataDocument {
            duration_seconds: None,
            tracks: vec![bigger, canonical],
        };

        let sizes = resolve(&doc, None, &NullSink);
        assert_eq!(sizes.at_height(720).unwrap().video, Some(10));
    }

    #[test]
    fn test_progressive_fallback_is_not_summed() {
        let mut muxed = track("18", "avc1.42001e", "mp4a.40.2", Some(360));
        muxed.exact_size_bytes = Some(12_000_000.0);
        let mut audio = track("140", "none", "mp4a.40.2", None);
        audio.exact_size_bytes = Some(3_000_000.0);
        let doc = MetadataDocument {
            duration_seconds: Some(100),
            tracks: vec![muxed, audio],
        };

        let sizes = resolve(&doc, None, &NullSink);
        let at_360 = sizes.at_height(360).unwrap();
        assert_eq!(at_360.video, None);
        assert_eq!(at_360.combined, Some(12_000_000));
        assert_eq!(sizes.audio, Some(3_000_000));
    }

    #[test]
    fn test_hint_used_only_without_document_duration() {
        let mut video = track("398", "av01", "none", Some(720));
        video.total_bitrate = Some(8.0);
        let doc = MetadataDocument {
            duration_seconds: None,
            tracks: vec![video],
        };

        let sizes = resolve(&doc, Some(10), &NullSink);
        assert_eq!(sizes.duration_seconds, Some(10));
        assert_eq!(sizes.at_height(720).unwrap().video, Some(10_000));

        let doc = MetadataDocument {
            duration_seconds: Some(20),
            ..doc
        };
        let sizes = resolve(&doc, Some(10), &NullSink);
        assert_eq!(sizes.at_height(720).unwrap().video, Some(20_000));
    }

    #[test]
    fn test_traces_reach_the_sink() {
        let sink = MemorySink::new();
        resolve(&MetadataDocument::default(), None, &sink);
        assert!(sink.contains("resolving 0 tracks"));
        assert!(sink.contains("format 251: no sized track"));
    }

    #[test]
    fn test_empty_has_no_sizes() {
        let sizes = ResolvedSizes::empty(Some(5));
        assert!(sizes.resolutions_unknown());
        assert!(!sizes.has_any_combined());
        assert_eq!(sizes.resolutions.len(), 7);
        assert_eq!(sizes.at_height(1080).unwrap().variants.len(), 3);
    }

    #[test]
    fn test_oversized_sums_are_unknown() {
        assert_eq!(combined_size(Some(u64::MAX), Some(1)), None);
        assert_eq!(combined_size(Some(40), Some(5)), Some(45));
        assert_eq!(combined_size(Some(40), None), None);

        let mut video = track("398", "av01", "none", Some(720));
        video.exact_size_bytes = Some(1e19);
        let mut audio = track("251", "none", "opus", None);
        audio.exact_size_bytes = Some(1e19);
        let doc = MetadataDocument {
            duration_seconds: None,
            tracks: vec![video, audio],
        };

        let sizes = resolve(&doc, None, &NullSink);
        let at_720 = sizes.at_height(720).unwrap();
        assert_eq!(at_720.video, Some(10_000_000_000_000_000_000));
        assert_eq!(at_720.combined, None);
        assert!(!sizes.has_any_combined());
    }
}
