// ============================================================================
// ytsize-host/src/commands/serve.rs
// ============================================================================
//
// NATIVE HOST MODE: One Request In, One Response Out
//
// The browser starts the host per message, writes one framed request to stdin
// and waits for one framed response on stdout. Every failure the extension
// should display becomes an `ok: false` response; only a broken protocol
// stream is reported as an error to the caller.

use log::{debug, info, warn};
use serde_json::Value;
use std::io::{self, Read, Write};
use ytsize_core::{
    CoreConfig, CoreResult, LogSink, MediaInspector, SizeProbe, YtDlpExecutor, validate_video_url,
};

use crate::messaging::{HostResponse, SizeRequest, read_message, write_message};

/// Message sent when the request carries no usable URL.
pub const NO_URL_MESSAGE: &str = "No URL provided.";

/// Turns one decoded request into a response.
pub fn handle_request(
    request: &Value,
    inspector: &dyn MediaInspector,
    config: &CoreConfig,
) -> HostResponse {
    let request = SizeRequest::from_value(request);
    let Some(url) = request.url else {
        warn!("Request is missing 'url'");
        return HostResponse::error(NO_URL_MESSAGE);
    };

    if let Err(e) = validate_video_url(&url) {
        warn!("Rejected URL: {}", url);
        return HostResponse::error(e.to_string());
    }

    if let Some(hint) = request.duration_hint {
        debug!("Duration hint received: {}", hint);
    }

    let probe = SizeProbe::new(inspector, &LogSink).with_max_error_len(config.max_error_len);
    match probe.run(&url, request.duration_hint) {
        Ok(report) => {
            info!("Sizes resolved for {}", url);
            HostResponse::Sizes(report)
        }
        Err(e) => {
            warn!("No sizes for {}: {}", url, e);
            HostResponse::error(e.to_string())
        }
    }
}

/// Serves at most one request from `reader`, answering on `writer`.
///
/// Returns whether a request was answered.
///
/// # Errors
///
/// Propagates protocol and I/O errors from reading or writing the stream.
pub fn serve<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    inspector: &dyn MediaInspector,
    config: &CoreConfig,
) -> CoreResult<bool> {
    let Some(request) = read_message(reader)? else {
        info!("No request received; exiting");
        return Ok(false);
    };

    let response = handle_request(&request, inspector, config);
    write_message(writer, &response)?;
    debug!("Response sent (ok={})", response.is_ok());
    Ok(true)
}

/// Runs the host on stdin/stdout with a real yt-dlp executor.
///
/// # Errors
///
/// Returns configuration, protocol and I/O errors.
pub fn run_native_host(config: &CoreConfig) -> CoreResult<()> {
    config.validate()?;
    let executor = YtDlpExecutor::new(config);
    debug!("Using yt-dlp at {}", executor.program().display());

    let stdin = io::stdin();
    let stdout = io::stdout();
    serve(&mut stdin.lock(), &mut stdout.lock(), &executor, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;
    use ytsize_core::ToolOutcome;
    use ytsize_core::external::MockInspector;

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    #[test]
    fn test_missing_url() {
        let inspector = MockInspector::new();
        let response = handle_request(&json!({}), &inspector, &CoreConfig::default());
        assert_eq!(response, HostResponse::error("No URL provided."));
        assert!(inspector.calls().is_empty());
    }

    #[test]
    fn test_unsafe_url_never_reaches_yt_dlp() {
        let inspector = MockInspector::new();
        let request = json!({"url": "https://youtu.be/dQw4w9WgXcQ;reboot"});
        let response = handle_request(&request, &inspector, &CoreConfig::default());
        assert_eq!(response, HostResponse::error("Invalid or unsafe YouTube URL"));
        assert!(inspector.calls().is_empty());
    }

    #[test]
    fn test_sizes_response() {
        let inspector = MockInspector::new().with_metadata_json(
            r#"{"duration": 212, "formats": [
                {"format_id": "398", "vcodec": "av01", "acodec": "none", "height": 720, "filesize": 40000000},
                {"format_id": "251", "vcodec": "none", "acodec": "opus", "filesize": 3000000}
            ]}"#,
        );
        let response = handle_request(&json!({"url": URL}), &inspector, &CoreConfig::default());
        let HostResponse::Sizes(report) = response else {
            panic!("expected sizes, got {response:?}");
        };
        assert_eq!(report.bytes("s720p"), Some(43_000_000));
        assert_eq!(report.duration_seconds(), Some(212));
    }

    #[test]
    fn test_tool_failure_becomes_error_response() {
        let inspector = MockInspector::new();
        inspector.push_metadata(ToolOutcome::not_found());
        inspector.push_listing(ToolOutcome::not_found());
        let request = json!({"url": URL, "duration_hint": 100});
        let response = handle_request(&request, &inspector, &CoreConfig::default());
        assert_eq!(
            response,
            HostResponse::error("yt-dlp not found in PATH. Please install yt-dlp.")
        );
    }

    #[test]
    fn test_serve_round_trip() {
        let body = serde_json::to_vec(&json!({"nothing": true})).unwrap();
        let mut input = (body.len() as u32).to_le_bytes().to_vec();
        input.extend_from_slice(&body);

        let mut output = Vec::new();
        let answered = serve(
            &mut Cursor::new(input),
            &mut output,
            &MockInspector::new(),
            &CoreConfig::default(),
        )
        .unwrap();
        assert!(answered);
        let reply: Value = serde_json::from_slice(&output[4..]).unwrap();
        assert_eq!(reply, json!({"ok": false, "error": "No URL provided."}));
    }

    #[test]
    fn test_serve_without_request_writes_nothing() {
        let mut output = Vec::new();
        let answered = serve(
            &mut Cursor::new(Vec::new()),
            &mut output,
            &MockInspector::new(),
            &CoreConfig::default(),
        )
        .unwrap();
        assert!(!answered);
        assert!(output.is_empty());
    }
}
