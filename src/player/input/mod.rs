//! Input handling for the interactive player.
//!
//! Key events are first mapped to a [`Control`], which is then applied to
//! a scheduler. Keeping the two steps apart lets hosts other than the CLI
//! drive the scheduler with the same controls.

mod keyboard;

pub use keyboard::{apply_control, map_key};

/// A user-level playback control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Start, pause or resume; restarts a finished playback
    TogglePause,
    SeekBackward,
    SeekForward,
    SeekStart,
    SeekEnd,
    SpeedUp,
    SpeedDown,
    Quit,
}

/// What the host loop should do after a control was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
}
