// ytsize-host/src/commands/probe.rs
//
// Manual probing: runs the same pipeline the browser triggers and prints the
// result to stdout, either as a table or as the exact JSON response.

use log::info;
use std::io::{self, Write};
use ytsize_core::{
    CoreConfig, CoreResult, LogSink, MediaInspector, SizeProbe, SizeReport, YtDlpExecutor,
    validate_video_url,
};

use crate::messaging::{HostResponse, encode_response};

/// Probes `url` with a real yt-dlp executor and prints the sizes.
///
/// # Errors
///
/// Returns the URL validation error, the probe failure or an I/O error.
pub fn run_probe(
    url: &str,
    duration_hint: Option<u64>,
    json: bool,
    config: &CoreConfig,
) -> CoreResult<()> {
    config.validate()?;
    let executor = YtDlpExecutor::new(config);
    let stdout = io::stdout();
    probe_to(&mut stdout.lock(), url, duration_hint, json, &executor, config)
}

/// Probes `url` with `inspector` and writes the result to `out`.
///
/// In JSON mode a failed probe is still printed, as the `ok: false`
/// response, and is not returned as an error.
pub fn probe_to<W: Write>(
    out: &mut W,
    url: &str,
    duration_hint: Option<u64>,
    json: bool,
    inspector: &dyn MediaInspector,
    config: &CoreConfig,
) -> CoreResult<()> {
    validate_video_url(url)?;
    info!("Probing {}", url);

    let result = SizeProbe::new(inspector, &LogSink)
        .with_max_error_len(config.max_error_len)
        .run(url, duration_hint);

    if json {
        let response = match result {
            Ok(report) => HostResponse::Sizes(report),
            Err(e) => HostResponse::error(e.to_string()),
        };
        out.write_all(&encode_response(&response))?;
        writeln!(out)?;
        return Ok(());
    }

    let report = result?;
    write_table(out, &report)?;
    Ok(())
}

/// Prints one `key  bytes  human` row per report entry.
fn write_table<W: Write>(out: &mut W, report: &SizeReport) -> io::Result<()> {
    let width = report
        .entries()
        .iter()
        .map(|(key, _)| key.len())
        .max()
        .unwrap_or(0);

    for (key, bytes) in report.entries() {
        let raw = bytes.map_or_else(|| "-".to_string(), |b| b.to_string());
        writeln!(out, "{key:<width$}  {raw:>12}  {}", report.human(key))?;
    }

    let duration = report.human_duration().unwrap_or_else(|| "N/A".to_string());
    writeln!(out, "{:<width$}  {:>12}  {}", "duration", "", duration)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use ytsize_core::external::MockInspector;

    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";
    const METADATA: &str = r#"{"duration": 212, "formats": [
        {"format_id": "398", "vcodec": "av01", "acodec": "none", "height": 720, "filesize": 40000000},
        {"format_id": "251", "vcodec": "none", "acodec": "opus", "filesize": 3000000}
    ]}"#;

    #[test]
    fn test_table_output() {
        let inspector = MockInspector::new().with_metadata_json(METADATA);
        let mut out = Vec::new();
        probe_to(&mut out, URL, None, false, &inspector, &CoreConfig::default()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let s720p = text.lines().find(|l| l.starts_with("s720p ")).unwrap();
        assert!(s720p.contains("43000000"));
        assert!(s720p.contains("43.00 MB"));
        assert!(text.lines().last().unwrap().ends_with("3:32"));
    }

    #[test]
    fn test_json_output_matches_host_response() {
        let inspector = MockInspector::new().with_metadata_json(METADATA);
        let mut out = Vec::new();
        probe_to(&mut out, URL, None, true, &inspector, &CoreConfig::default()).unwrap();

        let body: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["bytes"]["s720p"], 43_000_000);
        assert_eq!(body["duration"], 212);
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let inspector = MockInspector::new();
        let mut out = Vec::new();
        let err = probe_to(&mut out, "https://example.com/video", None, false, &inspector, &CoreConfig::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid or unsafe YouTube URL");
        assert!(out.is_empty());
    }
}
