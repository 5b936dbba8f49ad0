//! asciicast v3 export
//!
//! Reference: https://docs.asciinema.org/manual/asciicast/v3/
//!
//! Converts a decoded [`Recording`] into an asciicast v3 file so sessions
//! can be shared with the wider asciinema tooling. Only the subset needed
//! for replayed output is written: a header with the terminal size, output
//! events (`o`) and resize events (`r`).

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::recording::{FrameKind, Recording};

/// Export settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub title: Option<String>,
    /// Written to the header so players compress long pauses
    pub idle_time_limit: Option<f64>,
    /// Size used when the recording never announces one
    pub size: (u16, u16),
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: None,
            idle_time_limit: None,
            size: (80, 24),
        }
    }
}

/// asciicast v3 header
#[derive(Debug, Serialize)]
struct Header<'a> {
    version: u8,
    term: TermInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    idle_time_limit: Option<f64>,
}

/// Terminal information
#[derive(Debug, Serialize)]
struct TermInfo {
    cols: u16,
    rows: u16,
}

/// Writes events with intervals relative to the previous written event.
struct V3Encoder<W: Write> {
    writer: W,
    prev_ms: u64,
    events: usize,
}

impl<W: Write> V3Encoder<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            prev_ms: 0,
            events: 0,
        }
    }

    fn header(&mut self, header: &Header<'_>) -> Result<()> {
        let line = serde_json::to_string(header).context("Failed to serialize header")?;
        writeln!(self.writer, "{}", line).context("Failed to write header")?;
        Ok(())
    }

    fn event(&mut self, at_ms: u64, code: &str, data: &str) -> Result<()> {
        let interval = Duration::from_millis(at_ms.saturating_sub(self.prev_ms));
        self.prev_ms = at_ms;

        let data = serde_json::to_string(data).context("Failed to serialize event")?;
        writeln!(
            self.writer,
            "[{}, \"{}\", {}]",
            format_duration(interval),
            code,
            data
        )
        .context("Failed to write event")?;
        self.events += 1;
        Ok(())
    }
}

/// Write `recording` as asciicast v3. Returns the number of events written.
///
/// Delay frames produce no event; their time is folded into the interval
/// of the next event. UTF-8 sequences split across frames are carried over
/// to the next output event instead of being replaced.
pub fn write_v3<W: Write>(
    recording: &Recording,
    options: &ExportOptions,
    writer: W,
) -> Result<usize> {
    let (cols, rows) = recording.initial_size().unwrap_or(options.size);
    let mut encoder = V3Encoder::new(writer);
    encoder.header(&Header {
        version: 3,
        term: TermInfo { cols, rows },
        title: options.title.as_deref(),
        idle_time_limit: options.idle_time_limit,
    })?;

    let mut carry: Vec<u8> = Vec::new();
    let mut last_data_ms = 0;
    for frame in recording.frames() {
        match &frame.kind {
            FrameKind::Data(bytes) => {
                carry.extend_from_slice(bytes);
                last_data_ms = frame.offset_ms;
                let text = take_complete_utf8(&mut carry);
                if !text.is_empty() {
                    encoder.event(frame.offset_ms, "o", &text)?;
                }
            }
            FrameKind::Resize { cols, rows } => {
                encoder.event(frame.offset_ms, "r", &format!("{}x{}", cols, rows))?;
            }
            FrameKind::Delay => {}
        }
    }

    if !carry.is_empty() {
        let text = String::from_utf8_lossy(&carry);
        encoder.event(last_data_ms.max(encoder.prev_ms), "o", &text)?;
    }

    encoder.writer.flush().context("Failed to flush output")?;
    tracing::debug!(events = encoder.events, "exported asciicast v3");
    Ok(encoder.events)
}

/// Drain the decodable part of `buf`, leaving an incomplete trailing
/// UTF-8 sequence in place. Invalid bytes become U+FFFD.
fn take_complete_utf8(buf: &mut Vec<u8>) -> String {
    let keep = incomplete_suffix(buf);
    let tail = buf.split_off(buf.len() - keep);
    let text = String::from_utf8_lossy(buf).into_owned();
    *buf = tail;
    text
}

/// Length of a UTF-8 sequence cut off at the end of `bytes`.
fn incomplete_suffix(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let needed = match byte {
            0xF0..=0xF7 => 4,
            0xE0..=0xEF => 3,
            0xC0..=0xDF => 2,
            _ => 1,
        };
        return if needed > back { back } else { 0 };
    }
    0
}

fn format_duration(duration: Duration) -> String {
    let time_ms = duration.as_millis();
    format!("{}.{:03}", time_ms / 1_000, time_ms % 1_000)
}
