//! Session recording decoder.
//!
//! A recorded remote terminal session arrives as a text payload holding a
//! list of `{content, delay}` records. Each `content` is base64; once decoded
//! it is either a character-code buffer (terminal output), a resize
//! notification, or the literal `undefined` for a pure delay entry.
//!
//! Decoding is all-or-nothing: a single bad record rejects the whole payload
//! so a truncated replay is never shown.
//!
//! # Usage
//!
//! ```
//! use termreplay::recording::{decode, ContainerFormat, FrameKind};
//!
//! let payload = r#"[{"content":"YWJj","delay":0},{"content":"dW5kZWZpbmVk","delay":500}]"#;
//! let recording = decode(payload, ContainerFormat::Auto).unwrap();
//! assert_eq!(recording.len(), 2);
//! assert_eq!(recording.frames()[0].kind, FrameKind::Data(b"abc".to_vec()));
//! assert_eq!(recording.duration_ms(), 500);
//! ```

mod container;
mod content;
mod encode;
mod scan;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use encode::encode;
pub use scan::{scan, ScanReport, SecretMatch};

/// Errors produced while decoding a recording payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload does not have the expected structure.
    #[error("malformed recording: {reason}")]
    Malformed { reason: String },

    /// The payload parsed but held no records.
    #[error("recording contains no frames")]
    Empty,
}

impl DecodeError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub(crate) fn entry(index: usize, reason: impl std::fmt::Display) -> Self {
        Self::malformed(format!("entry {}: {}", index, reason))
    }
}

/// Errors produced while loading a recording from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// How the records are framed inside the payload.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerFormat {
    /// Detect the framing from the payload itself
    #[default]
    Auto,
    /// A single JSON array of records
    JsonArray,
    /// One record or array fragment per line
    Lines,
    /// Standalone HTML export with an embedded `transfer` array
    HtmlExport,
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerFormat::Auto => write!(f, "auto"),
            ContainerFormat::JsonArray => write!(f, "json-array"),
            ContainerFormat::Lines => write!(f, "lines"),
            ContainerFormat::HtmlExport => write!(f, "html-export"),
        }
    }
}

/// What a frame carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameKind {
    /// Terminal output bytes
    Data(Vec<u8>),
    /// New terminal dimensions
    Resize { cols: u16, rows: u16 },
    /// Pure delay; advances virtual time without producing output
    Delay,
}

/// One decoded unit of a recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub kind: FrameKind,
    /// Milliseconds since the start of the session
    pub offset_ms: u64,
}

impl Frame {
    pub fn data(offset_ms: u64, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: FrameKind::Data(bytes.into()),
            offset_ms,
        }
    }

    pub fn resize(offset_ms: u64, cols: u16, rows: u16) -> Self {
        Self {
            kind: FrameKind::Resize { cols, rows },
            offset_ms,
        }
    }

    pub fn delay(offset_ms: u64) -> Self {
        Self {
            kind: FrameKind::Delay,
            offset_ms,
        }
    }

    /// Output bytes, if this is a data frame.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.kind {
            FrameKind::Data(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self.kind, FrameKind::Data(_))
    }

    pub fn is_delay(&self) -> bool {
        matches!(self.kind, FrameKind::Delay)
    }
}

/// An immutable, time-ordered sequence of frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    frames: Vec<Frame>,
}

impl Recording {
    /// Build a recording, rejecting empty or out-of-order frame lists.
    pub fn new(frames: Vec<Frame>) -> Result<Self, DecodeError> {
        if frames.is_empty() {
            return Err(DecodeError::Empty);
        }

        for (index, pair) in frames.windows(2).enumerate() {
            if pair[1].offset_ms < pair[0].offset_ms {
                return Err(DecodeError::entry(
                    index + 1,
                    format!(
                        "offset {}ms precedes previous frame at {}ms",
                        pair[1].offset_ms, pair[0].offset_ms
                    ),
                ));
            }
        }

        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the recording has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Offset of the last frame.
    pub fn duration_ms(&self) -> u64 {
        self.frames.last().map(|f| f.offset_ms).unwrap_or(0)
    }

    /// Terminal size announced before any output was written.
    pub fn initial_size(&self) -> Option<(u16, u16)> {
        for frame in &self.frames {
            match frame.kind {
                FrameKind::Resize { cols, rows } => return Some((cols, rows)),
                FrameKind::Data(_) => return None,
                FrameKind::Delay => {}
            }
        }
        None
    }

    /// Number of frames with `offset_ms <= at_ms`.
    pub fn index_after(&self, at_ms: u64) -> usize {
        self.frames.partition_point(|f| f.offset_ms <= at_ms)
    }

    /// Total number of output bytes.
    pub fn data_bytes(&self) -> usize {
        self.frames.iter().filter_map(Frame::bytes).map(<[u8]>::len).sum()
    }

    pub fn count(&self, predicate: impl Fn(&Frame) -> bool) -> usize {
        self.frames.iter().filter(|f| predicate(f)).count()
    }

    /// All output joined together, decoded as lossy UTF-8.
    pub fn text(&self) -> String {
        let bytes: Vec<u8> = self
            .frames
            .iter()
            .filter_map(Frame::bytes)
            .flatten()
            .copied()
            .collect();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Decode a recording payload.
pub fn decode(input: &str, format: ContainerFormat) -> Result<Recording, DecodeError> {
    let records = container::extract(input, format)?;
    if records.is_empty() {
        return Err(DecodeError::Empty);
    }

    let mut frames = Vec::with_capacity(records.len());
    let mut offset_ms = 0u64;

    for (index, record) in records.iter().enumerate() {
        let at = match (record.offset, record.delay) {
            (Some(offset), _) => to_millis(index, "offset", offset)?,
            (None, Some(delay)) => offset_ms.saturating_add(to_millis(index, "delay", delay)?),
            (None, None) => offset_ms,
        };

        if at < offset_ms {
            return Err(DecodeError::entry(
                index,
                format!(
                    "offset {}ms precedes previous frame at {}ms",
                    at, offset_ms
                ),
            ));
        }
        offset_ms = at;

        let kind = content::interpret(index, &record.content)?;
        frames.push(Frame { kind, offset_ms });
    }

    let recording = Recording::new(frames)?;
    tracing::debug!(
        frames = recording.len(),
        duration_ms = recording.duration_ms(),
        %format,
        "decoded recording"
    );
    Ok(recording)
}

/// Read and decode a recording file.
pub fn decode_file<P: AsRef<Path>>(
    path: P,
    format: ContainerFormat,
) -> Result<Recording, LoadError> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode(&input, format)?)
}

fn to_millis(index: usize, field: &str, value: f64) -> Result<u64, DecodeError> {
    if !value.is_finite() || value < 0.0 {
        return Err(DecodeError::entry(
            index,
            format!("{} must be a non-negative number, got {}", field, value),
        ));
    }
    Ok(value.round() as u64)
}
