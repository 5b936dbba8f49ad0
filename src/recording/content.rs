//! Interpretation of a record's base64 `content` field.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{Map, Value};

use super::{DecodeError, FrameKind};

/// Content of a pure delay record (the producer serializes a missing body).
const DELAY_SENTINEL: &[u8] = b"undefined";

/// Decode one record's content into a frame kind.
pub(super) fn interpret(index: usize, encoded: &str) -> Result<FrameKind, DecodeError> {
    let raw = STANDARD
        .decode(encoded.trim())
        .map_err(|e| DecodeError::entry(index, format!("invalid base64 content: {}", e)))?;

    if raw == DELAY_SENTINEL {
        return Ok(FrameKind::Delay);
    }

    let kind = match structured(&raw) {
        Some(map) => from_object(index, map, raw)?,
        None => FrameKind::Data(raw),
    };

    Ok(match kind {
        FrameKind::Data(bytes) if bytes.is_empty() => FrameKind::Delay,
        kind => kind,
    })
}

/// Parse content that is a whole JSON object. Anything else is terminal output.
fn structured(raw: &[u8]) -> Option<Map<String, Value>> {
    let first = raw.iter().find(|b| !b.is_ascii_whitespace())?;
    if *first != b'{' {
        return None;
    }
    serde_json::from_slice(raw).ok()
}

fn from_object(
    index: usize,
    map: Map<String, Value>,
    raw: Vec<u8>,
) -> Result<FrameKind, DecodeError> {
    if let (Some(width), Some(height)) = (map.get("terminal_width"), map.get("terminal_height")) {
        let cols = dimension(index, "terminal_width", width)?;
        let rows = dimension(index, "terminal_height", height)?;
        return Ok(FrameKind::Resize { cols, rows });
    }

    let is_buffer = map.get("type").and_then(Value::as_str) == Some("Buffer");
    match map.get("data") {
        Some(Value::Array(items)) if is_buffer => char_codes(index, items).map(FrameKind::Data),
        Some(_) if is_buffer => Err(DecodeError::entry(index, "buffer data must be an array")),
        _ => Ok(FrameKind::Data(raw)),
    }
}

/// Convert a buffer's array of byte values into bytes.
fn char_codes(index: usize, items: &[Value]) -> Result<Vec<u8>, DecodeError> {
    items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|code| u8::try_from(code).ok())
                .ok_or_else(|| {
                    DecodeError::entry(index, format!("buffer byte {} is out of range", item))
                })
        })
        .collect()
}

fn dimension(index: usize, field: &str, value: &Value) -> Result<u16, DecodeError> {
    value
        .as_u64()
        .and_then(|v| u16::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| DecodeError::entry(index, format!("invalid {}: {}", field, value)))
}
