//! Info command handler

use anyhow::Result;
use humansize::{format_size, DECIMAL};

use super::{format_ms, load_recording};
use termreplay::cli::Input;
use termreplay::recording::Frame;
use termreplay::Config;

/// Print a summary of a recording.
#[cfg(not(tarpaulin_include))]
pub fn handle_info(input: &Input) -> Result<()> {
    let config = Config::load()?;
    let recording = load_recording(input, &config)?;

    let data = recording.count(Frame::is_data);
    let delay = recording.count(Frame::is_delay);
    let resize = recording.len() - data - delay;

    println!("File:      {}", input.file.display());
    println!(
        "Frames:    {} ({} output, {} resize, {} delay)",
        recording.len(),
        data,
        resize,
        delay
    );
    println!("Duration:  {}", format_ms(recording.duration_ms()));
    println!("Output:    {}", format_size(recording.data_bytes(), DECIMAL));
    match recording.initial_size() {
        Some((cols, rows)) => println!("Size:      {}x{}", cols, rows),
        None => println!(
            "Size:      not recorded (assuming {}x{})",
            config.terminal.cols, config.terminal.rows
        ),
    }
    Ok(())
}
