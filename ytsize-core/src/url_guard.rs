//! Allow-list check for URLs before they are handed to yt-dlp.
//!
//! Only plain YouTube watch, shorts and youtu.be links over HTTPS pass.
//! Anything carrying shell metacharacters, path traversal or a `file://`
//! scheme is rejected outright, even when it would otherwise match.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CoreError, CoreResult};

/// Longest URL accepted.
pub const MAX_URL_LEN: usize = 200;

static DANGEROUS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"[;&|`$(){}\[\]<>\\]", r"\$\(", r"`", r"\.\./", r"file://"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("dangerous pattern is valid"))
        .collect()
});

static YOUTUBE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https://(?:www\.|m\.)?(?:youtube\.com/(?:watch\?v=|shorts/)|youtu\.be/)([\w-]{11})")
        .expect("youtube url pattern is valid")
});

/// Accepts `url` only if it is a safe YouTube video link.
///
/// # Errors
///
/// Returns `CoreError::InvalidUrl` carrying the rejected input.
pub fn validate_video_url(url: &str) -> CoreResult<()> {
    if is_valid_video_url(url) {
        Ok(())
    } else {
        Err(CoreError::InvalidUrl(url.to_string()))
    }
}

#[must_use]
pub fn is_valid_video_url(url: &str) -> bool {
    if url.is_empty() || url.len() > MAX_URL_LEN {
        return false;
    }
    if DANGEROUS_PATTERNS.iter().any(|re| re.is_match(url)) {
        return false;
    }
    YOUTUBE_URL_RE.is_match(url)
}
