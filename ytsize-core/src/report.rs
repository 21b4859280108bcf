// ============================================================================
// ytsize-core/src/report.rs
// ============================================================================
//
// SIZE REPORT: Flat Key/Value View of Resolved Sizes
//
// The browser extension consumes a flat mapping with fixed key names:
//
//   s144p ... s1440p            combined bytes per resolution
//   v394 ... v400               video-only bytes per canonical id
//   v299, v303, v308            video-only bytes for extra codec variants
//   s1080p_299 ... s1440p_400   combined bytes per codec variant
//   a251                        shared audio bytes
//
// Serialised as {"bytes": {...}, "human": {...}, "duration": n|null}, with
// the keys above in that order and `human` carrying formatted text for each.

// ---- External crate imports ----
use serde::ser::{Serialize, SerializeMap, Serializer};

// ---- Internal crate imports ----
use crate::media::BEST_AUDIO_FORMAT_ID;
use crate::resolver::ResolvedSizes;
use crate::utils::{format_bytes, format_duration};

/// Ordered byte sizes for one video plus its duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeReport {
    entries: Vec<(String, Option<u64>)>,
    duration_seconds: Option<u64>,
}

impl SizeReport {
    /// Flattens resolved sizes into the fixed key order.
    #[must_use]
    pub fn from_resolved(sizes: &ResolvedSizes) -> Self {
        let mut entries = Vec::new();

        for r in &sizes.resolutions {
            entries.push((r.target.combined_key(), r.combined));
        }
        for r in &sizes.resolutions {
            entries.push((r.target.video_key(), r.video));
        }
        // Variants sharing the canonical id already appear as v399 / v400
        for r in &sizes.resolutions {
            for v in r.variants.iter().filter(|v| v.variant.format_id != r.target.format_id) {
                entries.push((format!("v{}", v.variant.format_id), v.video));
            }
        }
        for r in &sizes.resolutions {
            for v in &r.variants {
                entries.push((r.target.variant_key(&v.variant), v.combined));
            }
        }
        entries.push((format!("a{BEST_AUDIO_FORMAT_ID}"), sizes.audio));

        Self {
            entries,
            duration_seconds: sizes.duration_seconds,
        }
    }

    /// Every `(key, bytes)` pair in output order.
    #[must_use]
    pub fn entries(&self) -> &[(String, Option<u64>)] {
        &self.entries
    }

    /// Bytes for `key`; `None` when unknown or not a report key.
    #[must_use]
    pub fn bytes(&self, key: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, bytes)| *bytes)
    }

    /// Human-readable size for `key` (`"N/A"` when unknown).
    #[must_use]
    pub fn human(&self, key: &str) -> String {
        format_bytes(self.bytes(key))
    }

    #[must_use]
    pub fn duration_seconds(&self) -> Option<u64> {
        self.duration_seconds
    }

    /// Duration as `M:SS` or `H:MM:SS`.
    #[must_use]
    pub fn human_duration(&self) -> Option<String> {
        format_duration(self.duration_seconds.map(|d| d as f64))
    }

    /// Writes the `bytes`, `human` and `duration` entries into an open map,
    /// so wrappers can add their own keys around them.
    pub fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry("bytes", &BytesView(self))?;
        map.serialize_entry("human", &HumanView(self))?;
        map.serialize_entry("duration", &self.duration_seconds)
    }
}

impl Serialize for SizeReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        self.serialize_fields(&mut map)?;
        map.end()
    }
}

struct BytesView<'a>(&'a SizeReport);

impl Serialize for BytesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.entries.len()))?;
        for (key, bytes) in &self.0.entries {
            map.serialize_entry(key, bytes)?;
        }
        map.end()
    }
}

struct HumanView<'a>(&'a SizeReport);

impl Serialize for HumanView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.entries.len() + 1))?;
        for (key, bytes) in &self.0.entries {
            let text = bytes.map(|b| format_bytes(Some(b)));
            map.serialize_entry(key, &text)?;
        }
        map.serialize_entry("duration", &self.0.human_duration())?;
        map.end()
    }
}
