//! Integration tests for replaying decoded recordings

use std::time::Duration;

use super::helpers::{assert_same_screen, fixture, replay_calls, Player};
use termreplay::player::{Clock, PlaybackOptions, PlaybackState, SinkCall};
use termreplay::recording::{decode_file, Frame};
use termreplay::terminal::Color;
use termreplay::{decode, ContainerFormat, Recording};

fn write(text: &str) -> SinkCall {
    SinkCall::Write(text.as_bytes().to_vec())
}

#[test]
fn delay_entry_shifts_later_output() {
    // abc at 0, undefined after 500ms, def 200ms later
    let payload = r#"[
        {"content":"YWJj","delay":0},
        {"content":"dW5kZWZpbmVk","delay":500},
        {"content":"ZGVm","delay":200}
    ]"#;
    let mut player = Player::new(decode(payload, ContainerFormat::Auto).unwrap());
    player.scheduler.start().unwrap();

    assert_eq!(player.run_until(499), vec![(0, write("abc"))]);
    assert!(player.run_until(699).is_empty());
    assert_eq!(player.run_until(700), vec![(700, write("def"))]);
    assert_eq!(player.scheduler.state(), PlaybackState::Finished);
}

#[test]
fn fixture_replays_in_order() {
    let recording = decode_file(fixture("session.json"), ContainerFormat::Auto).unwrap();
    let mut player = Player::new(recording);
    player.scheduler.start().unwrap();

    let log = player.run_until(10_000);
    assert_eq!(
        log,
        vec![
            (0, SinkCall::Resize { cols: 80, rows: 24 }),
            (0, write("$ passwd\r\n")),
            (300, write("New password: ")),
            (1900, write("\r\npassword updated successfully\r\n$ ")),
        ]
    );
    assert_eq!(
        player.scheduler.screen().text(),
        "$ passwd\nNew password:\npassword updated successfully\n$"
    );
}

#[test]
fn pause_and_resume_preserve_remaining_wait() {
    let recording = decode_file(fixture("session.json"), ContainerFormat::Auto).unwrap();
    let mut player = Player::new(recording);
    player.scheduler.start().unwrap();
    player.run_until(1000);

    player.scheduler.pause().unwrap();
    player.clock.advance(Duration::from_secs(30));
    player.scheduler.start().unwrap();

    let timer = player.scheduler.pending_timer().unwrap();
    assert_eq!(timer.due - player.clock.now(), Duration::from_millis(500));
}

#[test]
fn seek_matches_straight_playback() {
    let recording = decode_file(fixture("session.json"), ContainerFormat::Auto).unwrap();

    let mut straight = Player::new(recording.clone());
    straight.scheduler.start().unwrap();
    straight.run_until(10_000);

    let mut seeking = Player::new(recording);
    seeking.scheduler.start().unwrap();
    seeking.scheduler.seek(10_000).unwrap();

    assert_eq!(
        seeking.scheduler.screen().text(),
        straight.scheduler.screen().text()
    );
    assert_eq!(
        seeking.scheduler.screen().snapshot(),
        straight.scheduler.screen().snapshot()
    );
}

#[test]
fn idle_limit_and_speed_compress_playback() {
    let recording = decode_file(fixture("session.json"), ContainerFormat::Auto).unwrap();
    let options = PlaybackOptions {
        speed: 2.0,
        idle_time_limit: Some(Duration::from_millis(400)),
        ..PlaybackOptions::default()
    };
    let mut player = Player::with_options(recording, options);
    player.scheduler.start().unwrap();

    let times: Vec<u64> = player
        .run_until(10_000)
        .into_iter()
        .map(|(at, _)| at)
        .collect();
    // 300ms, then 1200ms and 400ms capped to 400ms, all halved
    assert_eq!(times, vec![0, 0, 150, 550]);
    assert_eq!(player.scheduler.position(), 1900);
}

#[test]
fn dropped_sink_reports_unavailable() {
    let recording = decode_file(fixture("session.json"), ContainerFormat::Auto).unwrap();
    let mut player = Player::new(recording);
    player.scheduler.start().unwrap();
    player.run_until(0);

    player.sink.borrow_mut().close();
    player.clock.advance(Duration::from_millis(300));
    let timer = player.scheduler.pending_timer().unwrap();
    assert!(player.scheduler.on_timer(timer.token).is_err());
    assert_eq!(player.scheduler.state(), PlaybackState::Idle);
    assert_eq!(player.scheduler.pending_timer(), None);
}

/// A shell that sets a color, opens an editor on the alternate screen,
/// saves and restores the cursor inside it, then returns to the prompt.
fn editor_session() -> Recording {
    Recording::new(vec![
        Frame::resize(0, 20, 5),
        Frame::data(0, "$ vim\r\n"),
        Frame::data(100, "\x1b[31m"),
        Frame::data(200, "\x1b[?1049h\x1b[H\x1b[1;32mediting"),
        Frame::data(400, " more\r\n\x1b7\x1b[0mstatus"),
        Frame::data(500, "\x1b[44m"),
        Frame::data(600, "\x1b8!\x1b[?1049l"),
        Frame::data(800, "done\r\n"),
    ])
    .unwrap()
}

/// Play to the end, seeking to `seek_ms` first when given, and return
/// every call the sink saw.
fn sink_log(seek_ms: Option<u64>) -> (Player, Vec<SinkCall>) {
    let mut player = Player::new(editor_session());
    player.scheduler.start().unwrap();
    let mut calls = player.sink.borrow_mut().take();
    if let Some(at) = seek_ms {
        calls.extend(player.run_until(at).into_iter().map(|(_, call)| call));
        player.scheduler.seek(at).unwrap();
        calls.extend(player.sink.borrow_mut().take());
    }
    calls.extend(player.run_until(10_000).into_iter().map(|(_, call)| call));
    (player, calls)
}

#[test]
fn terminal_after_seek_matches_straight_playback() {
    let size = PlaybackOptions::default().size;
    let (straight, straight_calls) = sink_log(None);
    assert_eq!(straight.scheduler.state(), PlaybackState::Finished);
    let expected = replay_calls(size, &straight_calls);
    assert_same_screen(&expected, straight.scheduler.screen());

    // Before the color change, after it, inside the alternate screen, and
    // while a cursor saved on the alternate screen is pending
    for at in [50, 150, 300, 450, 550] {
        let (seeking, calls) = sink_log(Some(at));
        assert!(
            calls.iter().any(|call| matches!(call, SinkCall::Resync(_))),
            "seek to {at}"
        );
        assert_eq!(seeking.scheduler.state(), PlaybackState::Finished);
        assert_same_screen(&replay_calls(size, &calls), &expected);
    }
}

#[test]
fn output_after_seek_keeps_active_color() {
    let recording =
        Recording::new(vec![Frame::data(0, "\x1b[31m"), Frame::data(1000, "x")]).unwrap();
    let mut player = Player::new(recording);
    player.scheduler.start().unwrap();
    player.scheduler.seek(500).unwrap();
    let mut calls = player.sink.borrow_mut().take();
    calls.extend(player.run_until(2000).into_iter().map(|(_, call)| call));

    let screen = replay_calls(PlaybackOptions::default().size, &calls);
    let cell = screen.cell(0, 0).unwrap();
    assert_eq!(cell.ch, 'x');
    assert_eq!(cell.pen.fg, Color::Indexed(1));
}
