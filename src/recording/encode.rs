//! Writing recordings back into the JSON-array container.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::json;

use super::{FrameKind, Recording};

/// Encode a recording as a JSON array of `{content, delay}` records.
///
/// Output frames use the Node `Buffer` JSON shape, resizes use the
/// `terminal_width`/`terminal_height` properties and delays the `undefined`
/// sentinel, so the result decodes back to an equal recording.
pub fn encode(recording: &Recording) -> String {
    let mut previous = 0u64;
    let records: Vec<serde_json::Value> = recording
        .frames()
        .iter()
        .map(|frame| {
            let body = match &frame.kind {
                FrameKind::Data(bytes) => json!({ "type": "Buffer", "data": bytes }).to_string(),
                FrameKind::Resize { cols, rows } => {
                    json!({ "terminal_width": cols, "terminal_height": rows }).to_string()
                }
                FrameKind::Delay => "undefined".to_string(),
            };
            let delay = frame.offset_ms - previous;
            previous = frame.offset_ms;
            json!({ "content": STANDARD.encode(body), "delay": delay })
        })
        .collect();

    serde_json::Value::Array(records).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{decode, ContainerFormat, Frame};

    #[test]
    fn encoded_recording_decodes_to_same_frames() {
        let recording = Recording::new(vec![
            Frame::resize(0, 100, 30),
            Frame::data(0, "\x1b[1mbold\x1b[0m\r\n"),
            Frame::delay(450),
            Frame::data(1200, vec![0xe2, 0x94, 0x80]),
        ])
        .unwrap();

        let encoded = encode(&recording);
        assert_eq!(decode(&encoded, ContainerFormat::JsonArray).unwrap(), recording);
    }

    #[test]
    fn delays_are_relative() {
        let recording =
            Recording::new(vec![Frame::data(100, "a"), Frame::data(350, "b")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&encode(&recording)).unwrap();
        assert_eq!(value[0]["delay"], 100);
        assert_eq!(value[1]["delay"], 250);
    }
}
