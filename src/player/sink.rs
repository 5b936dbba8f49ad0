//! Terminal output sinks.
//!
//! A sink is the terminal widget the scheduler replays into. The scheduler
//! only calls it; whoever embeds the player owns its lifecycle.

use std::io::Write;

use crate::terminal::ScreenSnapshot;

/// Errors reported by a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink is closed")]
    Closed,

    #[error("sink I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of replayed terminal output.
pub trait TerminalSink {
    /// Display output bytes.
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Apply new terminal dimensions.
    fn resize(&mut self, cols: u16, rows: u16) -> Result<(), SinkError>;

    /// Replace everything shown with a snapshot (after a seek).
    fn resync(&mut self, snapshot: &ScreenSnapshot) -> Result<(), SinkError> {
        self.resize(snapshot.cols, snapshot.rows)?;
        self.write(&snapshot.redraw)
    }
}

/// Sink writing raw ANSI output to any writer (stdout for the CLI).
///
/// A real terminal cannot be resized by the player, so resizes are only
/// remembered; hosts can compare [`AnsiWriterSink::size`] with the actual
/// terminal to warn about clipping.
#[derive(Debug)]
pub struct AnsiWriterSink<W: Write> {
    writer: W,
    size: Option<(u16, u16)>,
}

impl<W: Write> AnsiWriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, size: None }
    }

    /// Last size announced by the recording.
    pub fn size(&self) -> Option<(u16, u16)> {
        self.size
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TerminalSink for AnsiWriterSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Result<(), SinkError> {
        tracing::debug!(cols, rows, "recording resized terminal");
        self.size = Some((cols, rows));
        Ok(())
    }
}

/// One call received by a [`CaptureSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Write(Vec<u8>),
    Resize { cols: u16, rows: u16 },
    Resync(ScreenSnapshot),
}

/// In-memory sink that records every call, for headless hosts and tests.
#[derive(Debug, Default)]
pub struct CaptureSink {
    calls: Vec<SinkCall>,
    closed: bool,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Drain recorded calls.
    pub fn take(&mut self) -> Vec<SinkCall> {
        std::mem::take(&mut self.calls)
    }

    /// Written output as lossy UTF-8, one entry per write.
    pub fn writes(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Write(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
                _ => None,
            })
            .collect()
    }

    /// Refuse every further call, as a torn-down widget would.
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn record(&mut self, call: SinkCall) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl TerminalSink for CaptureSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.record(SinkCall::Write(bytes.to_vec()))
    }

    fn resize(&mut self, cols: u16, rows: u16) -> Result<(), SinkError> {
        self.record(SinkCall::Resize { cols, rows })
    }

    fn resync(&mut self, snapshot: &ScreenSnapshot) -> Result<(), SinkError> {
        self.record(SinkCall::Resync(snapshot.clone()))
    }
}
