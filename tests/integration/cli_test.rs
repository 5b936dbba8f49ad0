//! Integration tests for the termreplay binary

use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::{fixture, termreplay};

#[test]
fn info_summarizes_recording() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .arg("info")
        .arg(fixture("session.html"))
        .assert()
        .success()
        .stdout(predicate::str::contains("5 (3 output, 1 resize, 1 delay)"))
        .stdout(predicate::str::contains("1.900s"))
        .stdout(predicate::str::contains("80x24"));
}

#[test]
fn check_passes_for_clean_recording() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .args(["check", "--secret", "hunter2"])
        .arg(fixture("session.json"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("OK"));
}

#[test]
fn check_fails_without_echoing_secret() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .args(["check", "-S", "hunter2"])
        .arg(fixture("leaked.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("secret #1 in frame 0"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn check_fails_for_recording_without_output() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .args(["check", "-S", "x"])
        .arg(fixture("delay_only.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no visible output"));
}

#[test]
fn malformed_recording_is_reported() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .arg("info")
        .arg(fixture("malformed.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("entry 1"));
}

#[test]
fn snapshot_prints_screen_at_time() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .args(["snapshot", "--at", "500"])
        .arg(fixture("session.ndjson"))
        .assert()
        .success()
        .stdout("$ passwd\nNew password:\n");
}

#[test]
fn convert_writes_asciicast() {
    let home = TempDir::new().unwrap();
    let out = home.path().join("session.cast");
    termreplay(&home)
        .arg("convert")
        .arg(fixture("session.json"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 4 events"));

    let cast = std::fs::read_to_string(&out).unwrap();
    assert!(cast.starts_with("{\"version\":3"));
    assert_eq!(cast.lines().count(), 5);
}

#[test]
fn config_uses_defaults_and_reports_path() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("speed = 1.0"))
        .stdout(predicate::str::contains("format = \"auto\""));

    termreplay(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("termreplay/config.toml"));
}

#[test]
fn configured_format_applies_without_flag() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config").join("termreplay");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[decode]\nformat = \"html-export\"\n",
    )
    .unwrap();

    termreplay(&home)
        .arg("info")
        .arg(fixture("session.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no embedded transfer array"));

    termreplay(&home)
        .args(["info", "--format", "json-array"])
        .arg(fixture("session.json"))
        .assert()
        .success();
}

#[test]
fn completions_are_generated() {
    let home = TempDir::new().unwrap();
    termreplay(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("termreplay"));
}
