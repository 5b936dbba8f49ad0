//! Check command handler

use anyhow::Result;

use super::{format_ms, load_recording};
use termreplay::cli::Input;
use termreplay::recording::scan;
use termreplay::Config;

/// Scan a recording for secrets.
///
/// Returns `true` when the replay has visible output and none of the
/// secrets occurs in it.
#[cfg(not(tarpaulin_include))]
pub fn handle_check(input: &Input, secrets: &[String]) -> Result<bool> {
    let config = Config::load()?;
    let recording = load_recording(input, &config)?;
    let report = scan(&recording, secrets);

    if !report.had_content {
        println!("FAIL: recording has no visible output");
        return Ok(false);
    }

    if report.is_clean() {
        println!(
            "OK: none of {} secret(s) found in {} frame(s)",
            secrets.len(),
            recording.len()
        );
        return Ok(true);
    }

    println!("FAIL: {} occurrence(s) found", report.matches.len());
    for found in &report.matches {
        // Never echo the secret itself
        println!(
            "  secret #{} in frame {} at {}",
            secrets.iter().position(|s| *s == found.secret).map_or(0, |i| i + 1),
            found.frame_index,
            format_ms(found.offset_ms)
        );
    }
    Ok(false)
}
