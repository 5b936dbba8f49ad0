//! Integration tests for secret scanning and asciicast export

use super::helpers::fixture;
use termreplay::asciicast::{write_v3, ExportOptions};
use termreplay::recording::{decode_file, scan};
use termreplay::ContainerFormat;

#[test]
fn clean_session_passes_scan() {
    let recording = decode_file(fixture("session.html"), ContainerFormat::Auto).unwrap();
    let report = scan(&recording, &["hunter2"]);
    assert!(report.had_content);
    assert!(report.is_clean());
}

#[test]
fn secret_split_across_frames_is_reported() {
    let recording = decode_file(fixture("leaked.json"), ContainerFormat::Auto).unwrap();
    let report = scan(&recording, &["hunter2"]);
    assert_eq!(report.matches.len(), 1);
    assert_eq!(report.matches[0].frame_index, 0);
    assert_eq!(report.matches[0].offset_ms, 0);
}

#[test]
fn delay_only_session_has_no_content() {
    let recording = decode_file(fixture("delay_only.json"), ContainerFormat::Auto).unwrap();
    assert!(!scan(&recording, &["x"]).had_content);
}

#[test]
fn export_writes_header_and_events() {
    let recording = decode_file(fixture("session.json"), ContainerFormat::Auto).unwrap();
    let mut out = Vec::new();
    let options = ExportOptions {
        title: Some("audit".to_string()),
        ..ExportOptions::default()
    };
    let events = write_v3(&recording, &options, &mut out).unwrap();
    assert_eq!(events, 4);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let header: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(header["version"], 3);
    assert_eq!(header["title"], "audit");
    assert_eq!(lines[1], "[0.000, \"r\", \"80x24\"]");
    assert_eq!(lines[2], "[0.000, \"o\", \"$ passwd\\r\\n\"]");
    assert_eq!(lines[3], "[0.300, \"o\", \"New password: \"]");
    // The pure delay at 1.5s folds into the next interval
    assert!(lines[4].starts_with("[1.600, \"o\""));
}
