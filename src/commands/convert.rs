//! Convert command handler

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};

use super::load_recording;
use termreplay::asciicast::{write_v3, ExportOptions};
use termreplay::cli::Input;
use termreplay::Config;

/// Export a recording as asciicast v3.
#[cfg(not(tarpaulin_include))]
pub fn handle_convert(input: &Input, output: &Path, title: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let recording = load_recording(input, &config)?;

    let options = ExportOptions {
        title,
        idle_time_limit: config.playback.idle_time_limit,
        size: (config.terminal.cols, config.terminal.rows),
    };
    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let events = write_v3(&recording, &options, BufWriter::new(file))?;

    println!("Wrote {} events to {}", events, output.display());
    Ok(())
}
