//! Play command handler
//!
//! Hosts the scheduler on the real terminal: raw mode and the alternate
//! screen for the duration of the replay, crossterm events for the
//! controls, and `event::poll` as the timer.

use std::cell::RefCell;
use std::io::{self, Stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute};

use super::load_recording;
use termreplay::cli::Input;
use termreplay::player::input::{apply_control, map_key, InputResult};
use termreplay::player::{AnsiWriterSink, MonotonicClock, PlaybackOptions, Scheduler};
use termreplay::Config;

/// Poll interval while nothing is scheduled (paused or finished).
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Restores the terminal when dropped, including on early returns.
struct TerminalGuard;

impl TerminalGuard {
    fn enter(stdout: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = stdout.flush();
    }
}

/// Replay a recording on the current terminal until the user quits.
#[cfg(not(tarpaulin_include))]
pub fn handle_play(input: &Input, speed: Option<f64>, idle_limit: Option<f64>) -> Result<()> {
    let config = Config::load()?;
    let recording = load_recording(input, &config)?;

    let mut playback = config.playback.clone();
    if let Some(speed) = speed {
        playback.speed = speed;
    }
    if idle_limit.is_some() {
        playback.idle_time_limit = idle_limit;
    }

    let size = recording
        .initial_size()
        .unwrap_or((config.terminal.cols, config.terminal.rows));
    warn_if_clipped(size);

    let options = PlaybackOptions::from_config(&playback, size);
    let sink = Rc::new(RefCell::new(AnsiWriterSink::new(io::stdout())));
    let mut scheduler = Scheduler::new(recording, &sink, MonotonicClock::new(), options)?;
    let step = config.seek_step();

    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout)?;
    scheduler.start()?;

    loop {
        let timeout = match scheduler.pending_timer() {
            Some(timer) => timer.due.saturating_sub(scheduler.now()),
            None => IDLE_POLL,
        };

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(control) = map_key(key) {
                    if apply_control(&mut scheduler, control, step)? == InputResult::Quit {
                        break;
                    }
                }
            }
            continue;
        }

        if let Some(timer) = scheduler.pending_timer() {
            if timer.due <= scheduler.now() {
                scheduler.on_timer(timer.token)?;
            }
        }
    }

    tracing::debug!(state = %scheduler.state(), "replay ended by user");
    Ok(())
}

/// Log a warning when the recording is larger than the terminal.
fn warn_if_clipped((cols, rows): (u16, u16)) {
    if let Ok((term_cols, term_rows)) = terminal::size() {
        if term_cols < cols || term_rows < rows {
            tracing::warn!(
                cols,
                rows,
                term_cols,
                term_rows,
                "terminal is smaller than the recording, output will be clipped"
            );
        }
    }
}
