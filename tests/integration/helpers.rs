//! Shared test helpers

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use assert_cmd::Command;
use tempfile::TempDir;
use termreplay::player::{CaptureSink, ManualClock, PlaybackOptions, Scheduler, SinkCall};
use termreplay::terminal::Screen;
use termreplay::Recording;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

pub fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture should be readable")
}

/// The binary with config and log directories redirected into `home`.
pub fn termreplay(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("termreplay").expect("binary should build");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("RUST_LOG");
    cmd
}

/// A scheduler on a manual clock replaying into a capture sink.
pub struct Player {
    pub clock: ManualClock,
    pub sink: Rc<RefCell<CaptureSink>>,
    pub scheduler: Scheduler<CaptureSink, ManualClock>,
}

impl Player {
    pub fn new(recording: Recording) -> Self {
        Self::with_options(recording, PlaybackOptions::default())
    }

    pub fn with_options(recording: Recording, options: PlaybackOptions) -> Self {
        let clock = ManualClock::new();
        let sink = Rc::new(RefCell::new(CaptureSink::new()));
        let scheduler = Scheduler::new(recording, &sink, clock.clone(), options)
            .expect("options should be valid");
        Self {
            clock,
            sink,
            scheduler,
        }
    }

    /// Fire every timer due up to `until_ms`; returns (ms, call) pairs.
    pub fn run_until(&mut self, until_ms: u64) -> Vec<(u64, SinkCall)> {
        let until = std::time::Duration::from_millis(until_ms);
        let mut log = Vec::new();
        while let Some(timer) = self.scheduler.pending_timer() {
            if timer.due > until {
                break;
            }
            self.clock.set(timer.due);
            self.scheduler
                .on_timer(timer.token)
                .expect("timer should fire");
            let at = timer.due.as_millis() as u64;
            log.extend(self.sink.borrow_mut().take().into_iter().map(|c| (at, c)));
        }
        self.clock.set(until);
        log
    }
}

/// Apply a sink call log to a fresh screen, the way a terminal would see it.
pub fn replay_calls(size: (u16, u16), calls: &[SinkCall]) -> Screen {
    let mut screen = Screen::new(size.0, size.1);
    for call in calls {
        match call {
            SinkCall::Write(bytes) => screen.feed(bytes),
            SinkCall::Resize { cols, rows } => screen.resize(*cols, *rows),
            SinkCall::Resync(snapshot) => {
                screen.resize(snapshot.cols, snapshot.rows);
                screen.feed(&snapshot.redraw);
            }
        }
    }
    screen
}

/// Assert two screens show the same cells, pens and cursor state.
pub fn assert_same_screen(actual: &Screen, expected: &Screen) {
    assert_eq!(actual.size(), expected.size());
    assert_eq!(actual.text(), expected.text());
    assert_eq!(actual.cursor(), expected.cursor());
    assert_eq!(actual.cursor_visible(), expected.cursor_visible());
    assert_eq!(actual.pen(), expected.pen());
    assert_eq!(actual.in_alternate_screen(), expected.in_alternate_screen());
    assert_eq!(actual.saved_cursor(), expected.saved_cursor());
    let (cols, rows) = expected.size();
    for row in 0..rows as usize {
        for col in 0..cols as usize {
            assert_eq!(actual.cell(row, col), expected.cell(row, col), "({row},{col})");
        }
    }
}
