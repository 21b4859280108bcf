// ============================================================================
// ytsize-host/src/messaging.rs
// ============================================================================
//
// NATIVE MESSAGING: Framing and Payloads for the Browser Extension
//
// Every message is a 4-byte little-endian length followed by that many bytes
// of UTF-8 JSON. Stdout belongs to the protocol; nothing else may write to it.
//
// KEY COMPONENTS:
// - read_message / write_message: framing over any Read / Write
// - SizeRequest: the decoded `{"url", "duration_hint"}` request
// - HostResponse: `{"ok": true, ...sizes}` or `{"ok": false, "error"}`

// ---- External crate imports ----
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use ytsize_core::utils::coerce_seconds;
use ytsize_core::{CoreError, CoreResult, SizeReport};

// ---- Standard library imports ----
use std::io::{self, Read, Write};

/// Largest incoming message accepted, in bytes.
pub const MAX_MESSAGE_LEN: u32 = 64 * 1024 * 1024;

/// Reads one framed JSON message.
///
/// Returns `Ok(None)` on a clean end of input or a zero-length message.
///
/// # Errors
///
/// `CoreError::Protocol` for a truncated header or body, an oversized
/// length or a body that is not JSON; `CoreError::Io` for read failures.
pub fn read_message<R: Read>(reader: &mut R) -> CoreResult<Option<Value>> {
    let mut header = [0u8; 4];
    let filled = read_full(reader, &mut header)?;
    if filled == 0 {
        return Ok(None);
    }
    if filled < header.len() {
        return Err(CoreError::Protocol(format!(
            "truncated length header ({filled} of 4 bytes)"
        )));
    }

    let length = u32::from_le_bytes(header);
    if length == 0 {
        return Ok(None);
    }
    if length > MAX_MESSAGE_LEN {
        return Err(CoreError::Protocol(format!(
            "message of {length} bytes exceeds the {MAX_MESSAGE_LEN} byte limit"
        )));
    }

    let mut body = vec![0u8; length as usize];
    let filled = read_full(reader, &mut body)?;
    if filled < body.len() {
        return Err(CoreError::Protocol(format!(
            "truncated message body ({filled} of {length} bytes)"
        )));
    }

    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|e| CoreError::Protocol(format!("message is not valid JSON: {e}")))
}

/// Fills `buf` as far as the input allows and returns how many bytes were read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> CoreResult<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

/// Serialises `response` as a framed message body. Never fails: an encoding
/// error is itself reported as an `ok: false` body.
#[must_use]
pub fn encode_response(response: &HostResponse) -> Vec<u8> {
    serde_json::to_vec(response).unwrap_or_else(|e| {
        let fallback = serde_json::json!({
            "ok": false,
            "error": format!("Failed to encode response: {e}"),
        });
        fallback.to_string().into_bytes()
    })
}

/// Writes one framed response and flushes.
///
/// # Errors
///
/// Returns `CoreError::Io` when the output cannot be written.
pub fn write_message<W: Write>(writer: &mut W, response: &HostResponse) -> CoreResult<()> {
    let body = encode_response(response);
    let length = u32::try_from(body.len())
        .map_err(|_| CoreError::Protocol(format!("response of {} bytes is too large", body.len())))?;
    writer.write_all(&length.to_le_bytes())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// A size request from the extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SizeRequest {
    /// `None` when missing, empty or not a string.
    pub url: Option<String>,
    /// Positive whole seconds; anything else is dropped.
    pub duration_hint: Option<u64>,
}

impl SizeRequest {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let url = value
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        let duration_hint = value.get("duration_hint").and_then(coerce_seconds);
        Self { url, duration_hint }
    }
}

/// What the host sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostResponse {
    Sizes(SizeReport),
    Error(String),
}

impl HostResponse {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        HostResponse::Error(message.into())
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, HostResponse::Sizes(_))
    }
}

impl Serialize for HostResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HostResponse::Sizes(report) => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("ok", &true)?;
                report.serialize_fields(&mut map)?;
                map.end()
            }
            HostResponse::Error(message) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("ok", &false)?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}
