//! Integration tests for decoding recordings from disk

use super::helpers::{fixture, read_fixture};
use termreplay::recording::{decode_file, encode, LoadError};
use termreplay::{decode, ContainerFormat, DecodeError, FrameKind};

#[test]
fn json_array_fixture_decodes() {
    let recording = decode_file(fixture("session.json"), ContainerFormat::Auto).unwrap();

    assert_eq!(recording.len(), 5);
    assert_eq!(recording.initial_size(), Some((80, 24)));
    assert_eq!(recording.duration_ms(), 1900);
    assert_eq!(
        recording.frames()[1].kind,
        FrameKind::Data(b"$ passwd\r\n".to_vec())
    );
    assert!(recording.frames()[3].is_delay());
    assert_eq!(recording.frames()[3].offset_ms, 1500);
}

#[test]
fn every_container_yields_the_same_recording() {
    let json = decode_file(fixture("session.json"), ContainerFormat::JsonArray).unwrap();
    let lines = decode_file(fixture("session.ndjson"), ContainerFormat::Lines).unwrap();
    let html = decode_file(fixture("session.html"), ContainerFormat::HtmlExport).unwrap();
    let auto_html = decode_file(fixture("session.html"), ContainerFormat::Auto).unwrap();
    let auto_lines = decode_file(fixture("session.ndjson"), ContainerFormat::Auto).unwrap();

    assert_eq!(json, lines);
    assert_eq!(json, html);
    assert_eq!(json, auto_html);
    assert_eq!(json, auto_lines);
}

#[test]
fn wrong_explicit_format_is_malformed() {
    let input = read_fixture("session.ndjson");
    assert!(matches!(
        decode(&input, ContainerFormat::HtmlExport),
        Err(DecodeError::Malformed { .. })
    ));
}

#[test]
fn bad_record_rejects_whole_recording() {
    let err = decode_file(fixture("malformed.json"), ContainerFormat::Auto).unwrap_err();
    match err {
        LoadError::Decode(DecodeError::Malformed { reason }) => {
            assert!(reason.contains("entry 1"), "unexpected reason: {}", reason)
        }
        other => panic!("expected malformed, got {:?}", other),
    }
}

#[test]
fn empty_payload_is_empty_error() {
    assert_eq!(decode("[]", ContainerFormat::Auto), Err(DecodeError::Empty));
    assert_eq!(decode("", ContainerFormat::Lines), Err(DecodeError::Empty));
}

#[test]
fn missing_file_is_io_error() {
    let err = decode_file(fixture("does-not-exist.json"), ContainerFormat::Auto).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn encoded_fixture_decodes_back() {
    let recording = decode_file(fixture("session.html"), ContainerFormat::Auto).unwrap();
    let again = decode(&encode(&recording), ContainerFormat::Auto).unwrap();
    assert_eq!(again, recording);
}
