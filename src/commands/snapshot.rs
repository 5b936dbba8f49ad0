//! Snapshot command handler

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;

use super::load_recording;
use termreplay::cli::Input;
use termreplay::player::{CaptureSink, ManualClock, PlaybackOptions, Scheduler};
use termreplay::Config;

/// Print the screen text as it looks at `at` milliseconds.
#[cfg(not(tarpaulin_include))]
pub fn handle_snapshot(input: &Input, at: Option<u64>) -> Result<()> {
    let config = Config::load()?;
    let recording = load_recording(input, &config)?;
    let at = at.unwrap_or_else(|| recording.duration_ms());
    let size = recording
        .initial_size()
        .unwrap_or((config.terminal.cols, config.terminal.rows));

    let sink = Rc::new(RefCell::new(CaptureSink::new()));
    let options = PlaybackOptions {
        size,
        ..PlaybackOptions::default()
    };
    let mut scheduler = Scheduler::new(recording, &sink, ManualClock::new(), options)?;
    scheduler.start()?;
    scheduler.seek(at)?;

    println!("{}", scheduler.screen().text());
    Ok(())
}
