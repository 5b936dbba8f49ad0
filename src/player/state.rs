//! Player state management
//!
//! Contains the playback state machine states, the cursor, the options the
//! scheduler is created with, and the timer types shared with the host.

use std::fmt;
use std::time::Duration;

use crate::config::PlaybackConfig;

/// Lifecycle of a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing scheduled; cursor at the start
    #[default]
    Idle,
    /// A timer is pending for the next frame
    Playing,
    /// Cursor frozen; remaining wait remembered
    Paused,
    /// Last frame emitted
    Finished,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Playing => write!(f, "playing"),
            PlaybackState::Paused => write!(f, "paused"),
            PlaybackState::Finished => write!(f, "finished"),
        }
    }
}

/// Position of the scheduler within a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Index of the next frame to emit
    pub next: usize,
    /// Virtual elapsed time in milliseconds
    pub position_ms: u64,
}

/// Settings a scheduler is created with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    /// Playback speed multiplier (1.0 = recorded pace)
    pub speed: f64,
    /// Upper bound for any single wait between frames, before speed scaling
    pub idle_time_limit: Option<Duration>,
    /// Terminal size assumed until the recording announces one
    pub size: (u16, u16),
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            idle_time_limit: None,
            size: (80, 24),
        }
    }
}

impl PlaybackOptions {
    pub fn from_config(playback: &PlaybackConfig, size: (u16, u16)) -> Self {
        Self {
            speed: playback.speed,
            idle_time_limit: playback
                .idle_time_limit
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64),
            size,
        }
    }
}

/// Identifies one armed timer. Tokens from superseded timers are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub(crate) u64);

/// The single timer a host should wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTimer {
    pub token: TimerToken,
    /// Clock time at which the host should call `on_timer`
    pub due: Duration,
}

/// Outcome of delivering a timer to the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The token was superseded by a pause, seek, reset or speed change
    Stale,
    /// Frames were emitted and the next timer is armed
    Emitted { frames: usize },
    /// The last frame was emitted
    Finished { frames: usize },
}
