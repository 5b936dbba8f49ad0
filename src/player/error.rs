//! Playback errors.

use super::state::PlaybackState;

/// Errors returned by the scheduler's control surface.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    /// The sink was torn down or refused output. Playback was stopped.
    #[error("terminal sink is no longer available")]
    SinkUnavailable,

    #[error("cannot {op} while {state}")]
    InvalidStateTransition {
        op: &'static str,
        state: PlaybackState,
    },

    #[error("playback speed must be a positive finite number, got {0}")]
    InvalidSpeed(f64),
}
