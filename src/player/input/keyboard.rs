//! Keyboard input handling for the interactive player.
//!
//! Handles playback controls, seeking and speed changes.

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Control, InputResult};
use crate::player::clock::Clock;
use crate::player::error::PlaybackError;
use crate::player::scheduler::Scheduler;
use crate::player::sink::TerminalSink;
use crate::player::state::PlaybackState;

const SPEED_FACTOR: f64 = 1.5;
const MAX_SPEED: f64 = 16.0;
const MIN_SPEED: f64 = 0.1;

/// Map a key event to a playback control.
///
/// Key releases and unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<Control> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let control = match key.code {
        // === Quit ===
        KeyCode::Char('q') | KeyCode::Esc => Control::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,

        // === Playback controls ===
        KeyCode::Char(' ') => Control::TogglePause,
        KeyCode::Char('+') | KeyCode::Char('=') => Control::SpeedUp,
        KeyCode::Char('-') | KeyCode::Char('_') => Control::SpeedDown,

        // === Seeking ===
        KeyCode::Char('<') | KeyCode::Char(',') | KeyCode::Left => Control::SeekBackward,
        KeyCode::Char('>') | KeyCode::Char('.') | KeyCode::Right => Control::SeekForward,
        KeyCode::Home => Control::SeekStart,
        KeyCode::End => Control::SeekEnd,

        _ => return None,
    };
    Some(control)
}

/// Apply a control to a scheduler.
///
/// `step` is the distance of one seek. Seeking is ignored while idle since
/// nothing has been shown yet.
pub fn apply_control<S: TerminalSink, C: Clock>(
    scheduler: &mut Scheduler<S, C>,
    control: Control,
    step: Duration,
) -> Result<InputResult, PlaybackError> {
    let step_ms = u64::try_from(step.as_millis()).unwrap_or(u64::MAX);

    match control {
        Control::Quit => return Ok(InputResult::Quit),
        Control::TogglePause => toggle_pause(scheduler)?,
        Control::SpeedUp => scheduler.set_speed((scheduler.speed() * SPEED_FACTOR).min(MAX_SPEED))?,
        Control::SpeedDown => {
            scheduler.set_speed((scheduler.speed() / SPEED_FACTOR).max(MIN_SPEED))?
        }
        seek if scheduler.state() == PlaybackState::Idle => {
            tracing::trace!(?seek, "ignoring seek before playback started");
        }
        Control::SeekBackward => scheduler.seek(scheduler.position().saturating_sub(step_ms))?,
        Control::SeekForward => scheduler.seek(scheduler.position().saturating_add(step_ms))?,
        Control::SeekStart => scheduler.seek(0)?,
        Control::SeekEnd => scheduler.seek(scheduler.duration_ms())?,
    }
    Ok(InputResult::Continue)
}

fn toggle_pause<S: TerminalSink, C: Clock>(
    scheduler: &mut Scheduler<S, C>,
) -> Result<(), PlaybackError> {
    match scheduler.state() {
        PlaybackState::Playing => scheduler.pause(),
        PlaybackState::Idle | PlaybackState::Paused => scheduler.start(),
        PlaybackState::Finished => {
            // Rewind; a seek out of Finished lands in Paused
            scheduler.seek(0)?;
            scheduler.start()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::player::clock::ManualClock;
    use crate::player::sink::CaptureSink;
    use crate::player::state::PlaybackOptions;
    use crate::recording::{Frame, Recording};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn scheduler() -> (Rc<RefCell<CaptureSink>>, Scheduler<CaptureSink, ManualClock>) {
        let sink = Rc::new(RefCell::new(CaptureSink::new()));
        let recording = Recording::new(vec![
            Frame::data(0, "a"),
            Frame::data(10_000, "b"),
            Frame::data(20_000, "c"),
        ])
        .unwrap();
        let scheduler = Scheduler::new(
            recording,
            &sink,
            ManualClock::new(),
            PlaybackOptions::default(),
        )
        .unwrap();
        (sink, scheduler)
    }

    const STEP: Duration = Duration::from_secs(5);

    #[test]
    fn maps_playback_keys() {
        assert_eq!(map_key(key(KeyCode::Char(' '))), Some(Control::TogglePause));
        assert_eq!(map_key(key(KeyCode::Char(','))), Some(Control::SeekBackward));
        assert_eq!(map_key(key(KeyCode::Right)), Some(Control::SeekForward));
        assert_eq!(map_key(key(KeyCode::Home)), Some(Control::SeekStart));
        assert_eq!(map_key(key(KeyCode::Char('+'))), Some(Control::SpeedUp));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(Control::Quit));
        assert_eq!(map_key(key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(event), Some(Control::Quit));
        assert_eq!(map_key(key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn key_release_is_ignored() {
        let mut event = key(KeyCode::Char(' '));
        event.kind = KeyEventKind::Release;
        assert_eq!(map_key(event), None);
    }

    #[test]
    fn toggle_pause_cycles_states() {
        let (_sink, mut scheduler) = scheduler();
        apply_control(&mut scheduler, Control::TogglePause, STEP).unwrap();
        assert_eq!(scheduler.state(), PlaybackState::Playing);
        apply_control(&mut scheduler, Control::TogglePause, STEP).unwrap();
        assert_eq!(scheduler.state(), PlaybackState::Paused);
        apply_control(&mut scheduler, Control::TogglePause, STEP).unwrap();
        assert_eq!(scheduler.state(), PlaybackState::Playing);
    }

    #[test]
    fn toggle_restarts_finished_playback() {
        let (_sink, mut scheduler) = scheduler();
        scheduler.start().unwrap();
        scheduler.seek(60_000).unwrap();
        assert_eq!(scheduler.state(), PlaybackState::Finished);

        apply_control(&mut scheduler, Control::TogglePause, STEP).unwrap();
        assert_eq!(scheduler.state(), PlaybackState::Playing);
        assert_eq!(scheduler.position(), 0);
    }

    #[test]
    fn seek_steps_move_position() {
        let (sink, mut scheduler) = scheduler();
        scheduler.start().unwrap();
        scheduler.pause().unwrap();

        apply_control(&mut scheduler, Control::SeekForward, STEP).unwrap();
        apply_control(&mut scheduler, Control::SeekForward, STEP).unwrap();
        assert_eq!(scheduler.position(), 10_000);
        assert_eq!(scheduler.screen().text(), "ab");

        apply_control(&mut scheduler, Control::SeekBackward, STEP).unwrap();
        assert_eq!(scheduler.position(), 5_000);
        assert_eq!(scheduler.screen().text(), "a");

        apply_control(&mut scheduler, Control::SeekEnd, STEP).unwrap();
        assert_eq!(scheduler.position(), 20_000);
        assert_eq!(sink.borrow().calls().len(), 4);
    }

    #[test]
    fn seek_while_idle_is_ignored() {
        let (sink, mut scheduler) = scheduler();
        let result = apply_control(&mut scheduler, Control::SeekForward, STEP).unwrap();
        assert_eq!(result, InputResult::Continue);
        assert_eq!(scheduler.state(), PlaybackState::Idle);
        assert!(sink.borrow().calls().is_empty());
    }

    #[test]
    fn speed_changes_are_clamped() {
        let (_sink, mut scheduler) = scheduler();
        apply_control(&mut scheduler, Control::SpeedUp, STEP).unwrap();
        assert_eq!(scheduler.speed(), 1.5);
        for _ in 0..20 {
            apply_control(&mut scheduler, Control::SpeedUp, STEP).unwrap();
        }
        assert_eq!(scheduler.speed(), MAX_SPEED);
        for _ in 0..40 {
            apply_control(&mut scheduler, Control::SpeedDown, STEP).unwrap();
        }
        assert_eq!(scheduler.speed(), MIN_SPEED);
    }

    #[test]
    fn quit_returns_quit() {
        let (_sink, mut scheduler) = scheduler();
        assert_eq!(
            apply_control(&mut scheduler, Control::Quit, STEP).unwrap(),
            InputResult::Quit
        );
    }
}
