//! Utility functions for formatting and numeric coercion.
//!
//! This module provides the small pure helpers used by the report and the
//! host: byte and duration humanizers, plus lenient number extraction for the
//! loosely typed values yt-dlp and the browser extension send.

use serde_json::Value;

/// Sentinel rendered for a size that could not be determined.
pub const NOT_AVAILABLE: &str = "N/A";

const DECIMAL_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Formats bytes with decimal (1000-based) units (B, KB, MB, GB, TB).
///
/// Plain bytes render as an integer, every other unit with two decimals.
/// `None` renders as `"N/A"`.
#[must_use]
pub fn format_bytes(bytes: Option<u64>) -> String {
    let Some(bytes) = bytes else {
        return NOT_AVAILABLE.to_string();
    };

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < DECIMAL_UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.2} {}", DECIMAL_UNITS[unit])
    }
}

/// Formats seconds as `H:MM:SS`, or `M:SS` when under an hour (e.g. 185 -> "3:05").
///
/// Fractional input is rounded to the nearest second. Returns `None` for
/// missing, negative or non-finite input.
#[must_use]
pub fn format_duration(seconds: Option<f64>) -> Option<String> {
    let seconds = seconds?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let total = seconds.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        Some(format!("{hours}:{minutes:02}:{secs:02}"))
    } else {
        Some(format!("{minutes}:{secs:02}"))
    }
}

/// Reads a JSON value as a number, accepting numeric strings.
///
/// Anything else (null, booleans, objects, unparsable text, NaN) is unknown.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Interprets a value as a whole number of seconds, truncating fractions.
///
/// Only strictly positive results are kept; zero, negative and non-numeric
/// values mean "no duration".
#[must_use]
pub fn coerce_seconds(value: &Value) -> Option<u64> {
    positive_seconds(coerce_number(value)?)
}

/// Truncates a float to whole seconds, keeping only positive values.
#[must_use]
pub fn positive_seconds(value: f64) -> Option<u64> {
    let truncated = value.trunc();
    (truncated.is_finite() && truncated >= 1.0).then_some(truncated as u64)
}
