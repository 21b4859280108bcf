// ============================================================================
// ytsize-core/src/format_list.rs
// ============================================================================
//
// FORMAT LIST PARSING: Sizes from `yt-dlp -F` Text Output
//
// Last-resort path used when the JSON metadata yields no combined size at all.
// The textual listing is a column table with one row per format:
//
//   398 mp4 1280x720 30 | 45.23MiB 2000k https | av01.0.05M.08 ...
//
// Only rows whose leading 3-4 digit id is one of the known canonical ids are
// read, and only the first binary-unit size token on each row counts.

// ---- External crate imports ----
use once_cell::sync::Lazy;
use regex::Regex;

// ---- Internal crate imports ----
use crate::media::known_format_ids;

// ---- Standard library imports ----
use std::collections::HashMap;

static FORMAT_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d{3,4})\b").expect("format id pattern is valid")
});

static SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(KiB|MiB|GiB|TiB)").expect("size pattern is valid")
});

/// Sizes keyed by format id, as read from a `yt-dlp -F` listing.
///
/// Every known id is present; ids the listing did not size map to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatListSizes {
    sizes: HashMap<&'static str, Option<u64>>,
}

impl FormatListSizes {
    /// Parses the listing text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sizes: HashMap<&'static str, Option<u64>> =
            known_format_ids().into_iter().map(|id| (id, None)).collect();

        for line in text.lines() {
            let Some(id) = FORMAT_ID_RE.captures(line).and_then(|c| c.get(1)) else {
                continue;
            };
            let Some(slot) = sizes.get_mut(id.as_str()) else {
                continue;
            };
            if let Some(bytes) = parse_size_token(line) {
                *slot = Some(bytes);
            }
        }

        Self { sizes }
    }

    /// Size for `format_id`; `None` when unknown or not a tracked id.
    #[must_use]
    pub fn get(&self, format_id: &str) -> Option<u64> {
        self.sizes.get(format_id).copied().flatten()
    }

    /// Whether no tracked id received a size.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.values().all(Option::is_none)
    }
}

/// Converts the first `<number> <KiB|MiB|GiB|TiB>` token of `line` to bytes.
fn parse_size_token(line: &str) -> Option<u64> {
    let captures = SIZE_RE.captures(line)?;
    let number: f64 = captures.get(1)?.as_str().parse().ok()?;
    let exponent = match captures.get(2)?.as_str() {
        "KiB" => 1,
        "MiB" => 2,
        "GiB" => 3,
        "TiB" => 4,
        _ => return None,
    };
    Some((number * 1024f64.powi(exponent)).round() as u64)
}
