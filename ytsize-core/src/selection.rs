// ============================================================================
// ytsize-core/src/selection.rs
// ============================================================================
//
// TRACK SELECTION: Picking the Best Track for a Resolution
//
// Given a pool of tracks, a media kind and optionally a target height, this
// module picks a single winner deterministically.
//
// KEY COMPONENTS:
// - TrackQuery: what to look for (kind and target height)
// - RankKey: one scoring signal; policies are ordered lists of keys
// - select_track / select: the selection entry points
//
// HEIGHT NARROWING:
// Exact height first, then the tallest height below the target, then the
// shortest height above it. Ranking only happens inside the narrowed pool.
//
// RANKING:
// Video and progressive pools rank by known size, total bitrate, frame rate.
// Audio pools rank by an additive codec/container preference, then audio
// bitrate. Ties keep the earliest track in input order.

// ---- Internal crate imports ----
use crate::media::{Track, TrackKind};
use crate::sizing::track_size;

// ---- Standard library imports ----
use std::cmp::Ordering;

/// One scoring signal. Higher scores rank first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKey {
    /// 1 when a size can be determined, else 0.
    KnownSize,
    TotalBitrate,
    FrameRate,
    /// Additive: Opus +3, AAC or .m4a +2, known size +2, WebM +1.
    AudioPreference,
    AudioBitrate,
}

/// Ranking used for video-only and progressive pools.
pub const VISUAL_RANKING: &[RankKey] = &[RankKey::KnownSize, RankKey::TotalBitrate, RankKey::FrameRate];

/// Ranking used for audio-only pools.
pub const AUDIO_RANKING: &[RankKey] = &[RankKey::AudioPreference, RankKey::AudioBitrate];

impl RankKey {
    fn score(self, track: &Track, duration_seconds: Option<u64>) -> f64 {
        match self {
            RankKey::KnownSize => {
                if track_size(track, duration_seconds).is_some() { 1.0 } else { 0.0 }
            }
            RankKey::TotalBitrate => track.total_bitrate.unwrap_or(0.0),
            RankKey::FrameRate => track.fps.unwrap_or(0.0),
            RankKey::AudioBitrate => track.audio_bitrate.unwrap_or(0.0),
            RankKey::AudioPreference => {
                let mut score = 0.0;
                if track.audio_codec.contains("opus") {
                    score += 3.0;
                }
                if track.extension == "webm" {
                    score += 1.0;
                }
                if track.audio_codec.contains("aac") || track.extension == "m4a" {
                    score += 2.0;
                }
                if track_size(track, duration_seconds).is_some() {
                    score += 2.0;
                }
                score
            }
        }
    }
}

/// What to select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackQuery {
    pub kind: TrackKind,
    /// Target height; ignored for audio-only queries.
    pub target_height: Option<u32>,
}

impl TrackQuery {
    #[must_use]
    pub fn audio() -> Self {
        Self {
            kind: TrackKind::AudioOnly,
            target_height: None,
        }
    }

    /// Video-only or progressive tracks nearest to `height`.
    #[must_use]
    pub fn at_height(kind: TrackKind, height: u32) -> Self {
        Self {
            kind,
            target_height: Some(height),
        }
    }

    fn ranking(&self) -> &'static [RankKey] {
        match self.kind {
            TrackKind::AudioOnly => AUDIO_RANKING,
            TrackKind::VideoOnly | TrackKind::Progressive => VISUAL_RANKING,
        }
    }

    fn admits(&self, track: &Track) -> bool {
        if track.kind() != Some(self.kind) {
            return false;
        }
        self.kind == TrackKind::AudioOnly || track.height.is_some()
    }
}

/// Picks the best track of `kind` for `target_height` (no height for audio).
#[must_use]
pub fn select_track(
    tracks: &[Track],
    kind: TrackKind,
    target_height: Option<u32>,
    duration_seconds: Option<u64>,
) -> Option<&Track> {
    let query = TrackQuery {
        kind,
        target_height,
    };
    select(tracks, &query, duration_seconds)
}

/// Picks the best track matching `query`, or `None` when nothing qualifies.
#[must_use]
pub fn select<'t>(
    tracks: &'t [Track],
    query: &TrackQuery,
    duration_seconds: Option<u64>,
) -> Option<&'t Track> {
    let candidates: Vec<&Track> = tracks.iter().filter(|t| query.admits(t)).collect();
    if candidates.is_empty() {
        return None;
    }

    let pool = match query.target_height {
        Some(target) if query.kind != TrackKind::AudioOnly => {
            narrow_by_height(candidates, target)
        }
        _ => candidates,
    };

    best_ranked(&pool, query.ranking(), duration_seconds)
}

fn narrow_by_height(candidates: Vec<&Track>, target: u32) -> Vec<&Track> {
    let at = |height: u32| -> Vec<&Track> {
        candidates
            .iter()
            .copied()
            .filter(|t| t.height == Some(height))
            .collect()
    };

    let exact = at(target);
    if !exact.is_empty() {
        return exact;
    }

    let heights = candidates.iter().filter_map(|t| t.height);
    if let Some(below) = heights.clone().filter(|h| *h < target).max() {
        return at(below);
    }
    match heights.filter(|h| *h > target).min() {
        Some(above) => at(above),
        None => Vec::new(),
    }
}

/// Lexicographic comparison over `keys`; the first strictly better track wins.
fn best_ranked<'t>(
    pool: &[&'t Track],
    keys: &[RankKey],
    duration_seconds: Option<u64>,
) -> Option<&'t Track> {
    let compare = |a: &Track, b: &Track| -> Ordering {
        for key in keys {
            let ordering = key
                .score(a, duration_seconds)
                .partial_cmp(&key.score(b, duration_seconds))
                .unwrap_or(Ordering::Equal);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    };

    let mut best: Option<&'t Track> = None;
    for &candidate in pool {
        match best {
            Some(current) if compare(candidate, current) != Ordering::Greater => {}
            _ => best = Some(candidate),
        }
    }
    best
}
