// ============================================================================
// ytsize-core/src/probe.rs
// ============================================================================
//
// SIZE PROBE: End-to-End Size Estimation for One URL
//
// Drives the collaborator and the engine for a single request:
//
// 1. Structured dump (`-J`); an undecodable payload counts as no document
// 2. Duration: document, then a positive hint, then a duration-only lookup
// 3. Resolve every target from the document
// 4. No resolution sized? Retry from the textual listing (`-F`)
// 5. Still no combined size anywhere? Fail with the most telling cause
//
// Failure causes are ranked: a missing yt-dlp beats a timeout, which beats
// the captured error text of the individual calls.

// ---- Internal crate imports ----
use crate::config::DEFAULT_MAX_ERROR_LEN;
use crate::diagnostics::DiagnosticSink;
use crate::error::{CoreError, CoreResult, truncate_message};
use crate::external::{MediaInspector, TOOL_NOT_FOUND_MESSAGE, TOOL_TIMEOUT_MESSAGE};
use crate::format_list::FormatListSizes;
use crate::media::MetadataDocument;
use crate::report::SizeReport;
use crate::resolver::{ResolvedSizes, resolve, resolve_format_list};

/// Message used when no call left any error text behind.
pub const NO_SIZE_MESSAGE: &str = "No size information could be determined from yt-dlp output.";

/// Failed calls made while serving one request, kept for the failure message.
#[derive(Debug, Default)]
struct FailureLog {
    metadata: Option<CoreError>,
    listing: Option<CoreError>,
    duration: Option<CoreError>,
}

impl FailureLog {
    fn tool_calls(&self) -> impl Iterator<Item = &CoreError> {
        self.metadata.iter().chain(self.listing.iter())
    }

    fn metadata_tool_missing(&self) -> bool {
        self.metadata.as_ref().is_some_and(CoreError::is_tool_not_found)
    }

    fn into_error(self, max_error_len: usize) -> CoreError {
        if self.tool_calls().any(CoreError::is_tool_not_found) {
            return CoreError::ToolNotFound(TOOL_NOT_FOUND_MESSAGE.to_string());
        }
        if self.tool_calls().any(CoreError::is_timeout) {
            return CoreError::ToolTimeout(TOOL_TIMEOUT_MESSAGE.to_string());
        }

        let messages: Vec<String> = [self.metadata, self.listing, self.duration]
            .into_iter()
            .flatten()
            .map(|error| truncate_message(&error.to_string(), max_error_len))
            .filter(|message| !message.is_empty())
            .collect();

        if messages.is_empty() {
            CoreError::NoSizeDeterminable(NO_SIZE_MESSAGE.to_string())
        } else {
            CoreError::NoSizeDeterminable(messages.join("; "))
        }
    }
}

/// Estimates download sizes for one URL through a MediaInspector.
pub struct SizeProbe<'a> {
    inspector: &'a dyn MediaInspector,
    sink: &'a dyn DiagnosticSink,
    max_error_len: usize,
}

impl<'a> SizeProbe<'a> {
    pub fn new(inspector: &'a dyn MediaInspector, sink: &'a dyn DiagnosticSink) -> Self {
        Self {
            inspector,
            sink,
            max_error_len: DEFAULT_MAX_ERROR_LEN,
        }
    }

    /// Bounds each captured error message, in characters.
    #[must_use]
    pub fn with_max_error_len(mut self, max_chars: usize) -> Self {
        self.max_error_len = max_chars;
        self
    }

    /// Runs the full estimation for `url`.
    ///
    /// `duration_hint` is discarded unless positive. The URL is passed to the
    /// inspector as-is; validate it first.
    ///
    /// # Errors
    ///
    /// Fails only when neither the structured nor the textual path produced a
    /// single combined size: `ToolNotFound`, `ToolTimeout` or
    /// `NoSizeDeterminable`, in that order of precedence.
    pub fn run(&self, url: &str, duration_hint: Option<u64>) -> CoreResult<SizeReport> {
        let mut failures = FailureLog::default();

        let document = self.fetch_document(url, &mut failures);
        let duration = self.resolve_duration(url, document.as_ref(), duration_hint, &mut failures);

        let mut sizes = match &document {
            Some(document) => resolve(document, duration, self.sink),
            None => ResolvedSizes::empty(duration),
        };

        if sizes.resolutions_unknown() {
            self.sink
                .trace("no resolution sized from metadata; trying format listing");
            if let Some(from_listing) = self.sizes_from_listing(url, duration, &mut failures) {
                sizes = from_listing;
            }
        }

        if !sizes.has_any_combined() {
            let error = failures.into_error(self.max_error_len);
            self.sink.trace(&format!("no sizes determined: {error}"));
            return Err(error);
        }

        Ok(SizeReport::from_resolved(&sizes))
    }

    fn fetch_document(&self, url: &str, failures: &mut FailureLog) -> Option<MetadataDocument> {
        let payload = match self.inspector.dump_metadata(url).into_result() {
            Ok(payload) => payload,
            Err(e) => {
                self.sink.trace(&format!("metadata dump failed: {e}"));
                failures.metadata = Some(e);
                return None;
            }
        };

        let parsed = match payload.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => MetadataDocument::from_json(text),
            _ => Err(CoreError::ParseFailure(
                "Failed to parse yt-dlp JSON: empty output".to_string(),
            )),
        };
        match parsed {
            Ok(document) => Some(document),
            Err(e) => {
                self.sink.trace(&e.to_string());
                failures.metadata = Some(e);
                None
            }
        }
    }

    fn resolve_duration(
        &self,
        url: &str,
        document: Option<&MetadataDocument>,
        duration_hint: Option<u64>,
        failures: &mut FailureLog,
    ) -> Option<u64> {
        if let Some(seconds) = document.and_then(|d| d.duration_seconds) {
            return Some(seconds);
        }
        if let Some(hint) = duration_hint.filter(|h| *h > 0) {
            self.sink
                .trace(&format!("skipping duration lookup; using hint {hint}"));
            return Some(hint);
        }
        if failures.metadata_tool_missing() {
            return None;
        }

        match self.inspector.fetch_duration(url).into_result() {
            Ok(seconds) => seconds.filter(|d| *d > 0),
            Err(e) => {
                self.sink.trace(&format!("duration lookup failed: {e}"));
                failures.duration = Some(e);
                None
            }
        }
    }

    fn sizes_from_listing(
        &self,
        url: &str,
        duration: Option<u64>,
        failures: &mut FailureLog,
    ) -> Option<ResolvedSizes> {
        let payload = match self.inspector.list_formats(url).into_result() {
            Ok(payload) => payload,
            Err(e) => {
                self.sink.trace(&format!("format listing failed: {e}"));
                failures.listing = Some(e);
                return None;
            }
        };

        let text = payload.filter(|text| !text.trim().is_empty())?;
        let parsed = FormatListSizes::parse(&text);
        Some(resolve_format_list(&parsed, duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemorySink, NullSink};
    use crate::external::{InspectorCall, MockInspector, ToolOutcome};

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    const TWO_TRACK_JSON: &str = r#"{
        "duration": 180,
        "formats": [
            {"format_id": "398", "vcodec": "av01.0.05M.08", "acodec": "none", "height": 720, "filesize": 40000000},
            {"format_id": "251", "vcodec": "none", "acodec": "opus", "ext": "webm", "filesize": 5000000}
        ]
    }"#;

    #[test]
    fn test_structured_path() {
        let inspector = MockInspector::new().with_metadata_json(TWO_TRACK_JSON);
        let report = SizeProbe::new(&inspector, &NullSink).run(URL, None).unwrap();

        assert_eq!(report.bytes("s720p"), Some(45_000_000));
        assert_eq!(report.bytes("v398"), Some(40_000_000));
        assert_eq!(report.bytes("a251"), Some(5_000_000));
        assert_eq!(report.duration_seconds(), Some(180));
        assert_eq!(inspector.calls(), vec![InspectorCall::DumpMetadata(URL.into())]);
    }

    #[test]
    fn test_bitrate_estimate_uses_looked_up_duration() {
        let json = r#"{"formats": [
            {"format_id": "398", "vcodec": "av01", "acodec": "none", "height": 720, "tbr": 2000},
            {"format_id": "251", "vcodec": "none", "acodec": "opus", "filesize": 1000}
        ]}"#;
        let inspector = MockInspector::new()
            .with_metadata_json(json)
            .with_duration(Some(180));
        let report = SizeProbe::new(&inspector, &NullSink).run(URL, None).unwrap();

        assert_eq!(report.bytes("v398"), Some(45_000_000));
        assert_eq!(report.bytes("s720p"), Some(45_001_000));
        assert_eq!(report.duration_seconds(), Some(180));
        assert_eq!(inspector.duration_lookups(), 1);
    }

    #[test]
    fn test_valid_hint_skips_duration_lookup() {
        let json = r#"{"formats": [
            {"format_id": "398", "vcodec": "av01", "acodec": "none", "height": 720, "tbr": 2000},
            {"format_id": "251", "vcodec": "none", "acodec": "opus", "filesize": 1000}
        ]}"#;
        let inspector = MockInspector::new().with_metadata_json(json);
        let report = SizeProbe::new(&inspector, &NullSink).run(URL, Some(10)).unwrap();

        assert_eq!(report.bytes("v398"), Some(2_500_000));
        assert_eq!(report.duration_seconds(), Some(10));
        assert_eq!(inspector.duration_lookups(), 0);
    }

    #[test]
    fn test_parse_failure_falls_back_to_listing() {
        let listing = "\
ID  EXT  RESOLUTION FPS | FILESIZE   TBR PROTO
251 webm audio only     |    3.00MiB 129k https
398 mp4  1280x720   30  |   40.00MiB 2000k https
";
        let inspector = MockInspector::new()
            .with_metadata_json("{invalid json}")
            .with_listing(listing)
            .with_duration(Some(213));
        let sink = MemorySink::new();
        let report = SizeProbe::new(&inspector, &sink).run(URL, None).unwrap();

        assert_eq!(report.bytes("v398"), Some(40 * 1024 * 1024));
        assert_eq!(report.bytes("a251"), Some(3 * 1024 * 1024));
        assert_eq!(report.bytes("s720p"), Some(43 * 1024 * 1024));
        assert_eq!(report.bytes("s1080p"), None);
        assert_eq!(report.duration_seconds(), Some(213));
        assert!(sink.contains("Failed to parse yt-dlp JSON"));
    }

    #[test]
    fn test_tool_not_found_wins() {
        let inspector = MockInspector::new();
        inspector.push_metadata(ToolOutcome::not_found());
        inspector.push_listing(ToolOutcome::timed_out("yt-dlp timed out while listing formats."));

        let err = SizeProbe::new(&inspector, &NullSink).run(URL, None).unwrap_err();
        assert!(err.is_tool_not_found());
        assert_eq!(err.to_string(), "yt-dlp not found in PATH. Please install yt-dlp.");
        // A missing tool is not asked for the duration
        assert_eq!(inspector.duration_lookups(), 0);
    }

    #[test]
    fn test_timeout_reported_with_generic_message() {
        let inspector = MockInspector::new().with_duration(None);
        inspector.push_metadata(ToolOutcome::timed_out("yt-dlp timed out while fetching metadata."));
        inspector.push_listing(ToolOutcome::failure(1, "ERROR: boom"));

        let err = SizeProbe::new(&inspector, &NullSink).run(URL, None).unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "yt-dlp timed out while fetching data.");
    }

    #[test]
    fn test_error_messages_are_joined_and_truncated() {
        let inspector = MockInspector::new();
        inspector.push_metadata(ToolOutcome::failure(1, "ERROR: Private video"));
        inspector.push_listing(ToolOutcome::failure(1, "x".repeat(50)));
        inspector.push_duration(ToolOutcome::failure(2, "ERROR: duration"));

        let err = SizeProbe::new(&inspector, &NullSink)
            .with_max_error_len(20)
            .run(URL, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::NoSizeDeterminable(_)));
        assert_eq!(
            err.to_string(),
            format!("ERROR: Private video; {}; ERROR: duration", "x".repeat(20))
        );
    }

    #[test]
    fn test_exit_code_reported_when_stderr_is_silent() {
        let inspector = MockInspector::new().with_duration(None);
        inspector.push_metadata(ToolOutcome {
            payload: None,
            error: None,
            code: 2,
        });
        inspector.push_listing(ToolOutcome::failure(1, "ERROR: Video unavailable"));

        let sink = MemorySink::new();
        let err = SizeProbe::new(&inspector, &sink).run(URL, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "yt-dlp exited with code 2; ERROR: Video unavailable"
        );
        assert!(sink.contains("metadata dump failed: yt-dlp exited with code 2"));
    }

    #[test]
    fn test_default_message_when_nothing_was_captured() {
        let inspector = MockInspector::new()
            .with_metadata_json(r#"{"duration": 60, "formats": []}"#)
            .with_listing("nothing useful here");

        let err = SizeProbe::new(&inspector, &NullSink).run(URL, None).unwrap_err();
        assert_eq!(err.to_string(), NO_SIZE_MESSAGE);
        assert_eq!(inspector.listing_lookups(), 1);
    }
}
