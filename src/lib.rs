//! termreplay: decode and replay recorded remote terminal sessions.
//!
//! Recordings are sequences of base64 encoded `{content, delay}` records
//! exported by a device management console. This crate decodes them into
//! time-ordered frames and replays them into a terminal sink at recorded
//! pace, with pause, seek and speed control.
//!
//! - [`recording`]: frame decoding, secret scanning and re-encoding
//! - [`player`]: the playback scheduler and terminal sinks
//! - [`terminal`]: the screen model used to resynchronize after seeks
//! - [`asciicast`]: asciicast v3 export

pub mod asciicast;
pub mod cli;
pub mod config;
pub mod player;
pub mod recording;
pub mod terminal;

pub use config::Config;
pub use player::{PlaybackError, PlaybackOptions, PlaybackState, Scheduler};
pub use recording::{decode, decode_file, ContainerFormat, DecodeError, Frame, FrameKind, Recording};
