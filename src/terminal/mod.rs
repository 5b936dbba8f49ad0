//! Virtual terminal emulator module.
//!
//! Provides a VTE-based screen model for replaying recorded terminal output.
//! Handles ANSI escape sequences and maintains terminal state so the player
//! can redraw the cumulative screen after a seek, and the CLI can print a
//! snapshot at any point of a recording.

mod handlers;
mod render;
mod screen;
mod types;

pub use render::ScreenSnapshot;
pub use screen::Screen;
pub use types::{Cell, Color, Pen};
