//! Resolution targets and the canonical yt-dlp format ids tied to them.
//!
//! YouTube publishes a stable id per resolution (394 = 144p AV1, ..., 400 =
//! 1440p AV1) and a best-quality Opus audio id (251). Those ids are tried
//! before any height-based search.

/// Canonical id of the best Opus audio track.
pub const BEST_AUDIO_FORMAT_ID: &str = "251";

/// A named codec variant reported separately at a multi-codec height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecVariant {
    pub format_id: &'static str,
}

/// One of the fixed resolutions sizes are reported for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTarget {
    /// Frame height in pixels.
    pub height: u32,
    /// Canonical video-only format id for this height.
    pub format_id: &'static str,
    /// Codec variants reported individually (empty for most heights).
    pub variants: &'static [CodecVariant],
}

impl ResolutionTarget {
    /// Output key for the combined size, e.g. `s720p`.
    #[must_use]
    pub fn combined_key(&self) -> String {
        format!("s{}p", self.height)
    }

    /// Output key for the video-only size, e.g. `v398`.
    #[must_use]
    pub fn video_key(&self) -> String {
        format!("v{}", self.format_id)
    }

    /// Output key for a codec variant's combined size, e.g. `s1080p_299`.
    #[must_use]
    pub fn variant_key(&self, variant: &CodecVariant) -> String {
        format!("s{}p_{}", self.height, variant.format_id)
    }
}

const VARIANTS_1080: &[CodecVariant] = &[
    CodecVariant { format_id: "299" },
    CodecVariant { format_id: "303" },
    CodecVariant { format_id: "399" },
];

const VARIANTS_1440: &[CodecVariant] = &[
    CodecVariant { format_id: "308" },
    CodecVariant { format_id: "400" },
];

/// All targets, lowest resolution first.
pub const RESOLUTION_TARGETS: [ResolutionTarget; 7] = [
    ResolutionTarget { height: 144, format_id: "394", variants: &[] },
    ResolutionTarget { height: 240, format_id: "395", variants: &[] },
    ResolutionTarget { height: 360, format_id: "396", variants: &[] },
    ResolutionTarget { height: 480, format_id: "397", variants: &[] },
    ResolutionTarget { height: 720, format_id: "398", variants: &[] },
    ResolutionTarget { height: 1080, format_id: "399", variants: VARIANTS_1080 },
    ResolutionTarget { height: 1440, format_id: "400", variants: VARIANTS_1440 },
];

/// Every format id the textual listing is scanned for: the per-height ids,
/// the extra codec-variant ids and the audio id, without duplicates.
#[must_use]
pub fn known_format_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = RESOLUTION_TARGETS.iter().map(|t| t.format_id).collect();
    for target in &RESOLUTION_TARGETS {
        for variant in target.variants {
            if !ids.contains(&variant.format_id) {
                ids.push(variant.format_id);
            }
        }
    }
    ids.push(BEST_AUDIO_FORMAT_ID);
    ids
}
