//! Subcommand handlers for the termreplay binary.

pub mod check;
pub mod completions;
pub mod config;
pub mod convert;
pub mod info;
pub mod play;
pub mod snapshot;

use anyhow::{Context, Result};

use termreplay::cli::Input;
use termreplay::recording::{decode_file, Recording};
use termreplay::Config;

/// Decode the recording named on the command line.
///
/// `--format` wins over the configured container format.
pub fn load_recording(input: &Input, config: &Config) -> Result<Recording> {
    let format = input.format.unwrap_or(config.decode.format);
    decode_file(&input.file, format)
        .with_context(|| format!("Failed to load recording {}", input.file.display()))
}

/// Format milliseconds as e.g. `1h 2m 3.456s`.
pub fn format_ms(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms % 60_000) as f64 / 1000.0;

    if hours > 0 {
        format!("{}h {}m {:.3}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {:.3}s", minutes, seconds)
    } else {
        format!("{:.3}s", seconds)
    }
}
