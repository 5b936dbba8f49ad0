//! Playback scheduler.
//!
//! Replays a [`Recording`] into a [`TerminalSink`] at recorded pace. The
//! scheduler is single-threaded and never blocks: it arms at most one timer
//! (exposed through [`Scheduler::pending_timer`]) and the host delivers it
//! back with [`Scheduler::on_timer`] once the due time has passed.
//!
//! Every transition that invalidates the pending wait (pause, seek, reset,
//! speed change, sink failure) bumps a generation counter, so a timer the
//! host fires late is recognised as stale and does nothing.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::clock::{Clock, MonotonicClock};
use super::error::PlaybackError;
use super::sink::{SinkError, TerminalSink};
use super::state::{Cursor, PendingTimer, PlaybackOptions, PlaybackState, Tick, TimerToken};
use crate::recording::{FrameKind, Recording};
use crate::terminal::Screen;

/// A timer armed for the frame at `cursor.next`.
#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    due: Duration,
    armed_at: Duration,
    /// Virtual position when the timer was armed
    from_ms: u64,
}

/// Drives playback of one recording.
pub struct Scheduler<S: TerminalSink, C: Clock = MonotonicClock> {
    recording: Recording,
    sink: Weak<RefCell<S>>,
    clock: C,
    speed: f64,
    idle_time_limit: Option<Duration>,
    size: (u16, u16),
    state: PlaybackState,
    cursor: Cursor,
    /// Mirror of the sink: every frame before `cursor.next` applied
    screen: Screen,
    generation: u64,
    pending: Option<Armed>,
    /// Wait left on the pending timer when paused
    remaining: Option<Duration>,
    /// The sink shows output from an earlier run
    dirty: bool,
}

impl<S: TerminalSink, C: Clock> Scheduler<S, C> {
    /// Create an idle scheduler.
    ///
    /// The scheduler keeps only a weak reference to the sink; dropping the
    /// last strong reference makes playback fail with `SinkUnavailable`.
    pub fn new(
        recording: Recording,
        sink: &Rc<RefCell<S>>,
        clock: C,
        options: PlaybackOptions,
    ) -> Result<Self, PlaybackError> {
        validate_speed(options.speed)?;
        let (cols, rows) = options.size;

        Ok(Self {
            recording,
            sink: Rc::downgrade(sink),
            clock,
            speed: options.speed,
            idle_time_limit: options.idle_time_limit,
            size: options.size,
            state: PlaybackState::Idle,
            cursor: Cursor::default(),
            screen: Screen::new(cols, rows),
            generation: 0,
            pending: None,
            remaining: None,
            dirty: false,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    /// What the sink currently shows.
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn duration_ms(&self) -> u64 {
        self.recording.duration_ms()
    }

    /// Current time on the scheduler's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// The timer the host should fire next, if any.
    pub fn pending_timer(&self) -> Option<PendingTimer> {
        self.pending.map(|armed| PendingTimer {
            token: armed.token,
            due: armed.due,
        })
    }

    /// Virtual elapsed time, interpolated while waiting for a frame.
    pub fn position(&self) -> u64 {
        match self.pending {
            Some(armed) => self.interpolate(&armed, self.clock.now()),
            None => self.cursor.position_ms,
        }
    }

    /// Begin playback from `Idle`, or resume from `Paused`.
    pub fn start(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlaybackState::Idle => {
                self.rewind();
                if self.dirty {
                    let blank = self.screen.snapshot();
                    if let Err(err) = call_sink(&self.sink, |sink| sink.resync(&blank)) {
                        return Err(self.fail(err));
                    }
                    self.dirty = false;
                } else if self.sink.strong_count() == 0 {
                    return Err(self.fail(SinkError::Closed));
                }
                self.transition(PlaybackState::Playing);
                self.arm_next();
            }
            PlaybackState::Paused => {
                self.transition(PlaybackState::Playing);
                match self.remaining.take() {
                    Some(wait) => self.arm(wait),
                    None => self.arm_next(),
                }
            }
            state => return Err(invalid("start", state)),
        }
        Ok(())
    }

    /// Freeze playback, remembering the wait left until the next frame.
    pub fn pause(&mut self) -> Result<(), PlaybackError> {
        if self.state != PlaybackState::Playing {
            return Err(invalid("pause", self.state));
        }

        let now = self.clock.now();
        if let Some(armed) = self.cancel() {
            self.cursor.position_ms = self.interpolate(&armed, now);
            self.remaining = Some(armed.due.saturating_sub(now));
        }
        self.transition(PlaybackState::Paused);
        Ok(())
    }

    /// Jump to `target_ms`, redrawing the sink once with the cumulative
    /// screen state instead of emitting every skipped frame.
    pub fn seek(&mut self, target_ms: u64) -> Result<(), PlaybackError> {
        if self.state == PlaybackState::Idle {
            return Err(invalid("seek", self.state));
        }

        self.cancel();
        self.remaining = None;

        let target = self.recording.index_after(target_ms);
        if target < self.cursor.next {
            let (cols, rows) = self.size;
            self.screen.reset(cols, rows);
            self.cursor.next = 0;
        }
        for frame in &self.recording.frames()[self.cursor.next..target] {
            apply(&mut self.screen, &frame.kind);
        }

        let snapshot = self.screen.snapshot();
        if let Err(err) = call_sink(&self.sink, |sink| sink.resync(&snapshot)) {
            return Err(self.fail(err));
        }
        self.dirty = true;

        self.cursor = Cursor {
            next: target,
            position_ms: target_ms.min(self.recording.duration_ms()),
        };
        debug!(target_ms, frame = target, "seeked");

        let has_more = target < self.recording.len();
        match self.state {
            PlaybackState::Playing => self.arm_next(),
            PlaybackState::Finished if has_more => self.transition(PlaybackState::Paused),
            _ => {}
        }
        Ok(())
    }

    /// Stop playback and return to `Idle` with the cursor at the start.
    pub fn reset(&mut self) {
        self.cancel();
        self.remaining = None;
        self.rewind();
        self.transition(PlaybackState::Idle);
    }

    /// Change the speed multiplier, rescaling whatever wait is outstanding.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), PlaybackError> {
        validate_speed(speed)?;
        let factor = self.speed / speed;
        self.speed = speed;

        if let Some(armed) = self.cancel() {
            let now = self.clock.now();
            self.cursor.position_ms = self.interpolate(&armed, now);
            self.arm(scale(armed.due.saturating_sub(now), factor));
        }
        if let Some(left) = self.remaining {
            self.remaining = Some(scale(left, factor));
        }
        debug!(speed, "playback speed changed");
        Ok(())
    }

    /// Deliver a timer. Emits every frame due at the timer's frame offset.
    pub fn on_timer(&mut self, token: TimerToken) -> Result<Tick, PlaybackError> {
        match self.pending {
            Some(armed) if armed.token == token => self.pending = None,
            _ => {
                trace!(?token, "ignoring stale timer");
                return Ok(Tick::Stale);
            }
        }

        let due_at = match self.recording.frames().get(self.cursor.next) {
            Some(frame) => frame.offset_ms,
            None => {
                self.transition(PlaybackState::Finished);
                return Ok(Tick::Finished { frames: 0 });
            }
        };

        let end = self.recording.index_after(due_at);
        let mut emitted = 0;
        for index in self.cursor.next..end {
            if self.emit(index)? {
                emitted += 1;
            }
            self.cursor.next = index + 1;
        }
        self.cursor.position_ms = due_at;

        if self.cursor.next >= self.recording.len() {
            self.transition(PlaybackState::Finished);
            Ok(Tick::Finished { frames: emitted })
        } else {
            self.arm_next();
            Ok(Tick::Emitted { frames: emitted })
        }
    }

    /// Push one frame to the sink and the mirror screen.
    ///
    /// Returns whether the sink was called.
    fn emit(&mut self, index: usize) -> Result<bool, PlaybackError> {
        let frame = &self.recording.frames()[index];
        let result = match &frame.kind {
            FrameKind::Data(bytes) => {
                self.screen.feed(bytes);
                call_sink(&self.sink, |sink| sink.write(bytes))
            }
            FrameKind::Resize { cols, rows } => {
                self.screen.resize(*cols, *rows);
                call_sink(&self.sink, |sink| sink.resize(*cols, *rows))
            }
            FrameKind::Delay => return Ok(false),
        };
        trace!(index, offset_ms = frame.offset_ms, "emitted frame");

        match result {
            Ok(()) => {
                self.dirty = true;
                Ok(true)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Arm the timer for the frame at the cursor, or finish.
    fn arm_next(&mut self) {
        match self.recording.frames().get(self.cursor.next) {
            Some(frame) => {
                let gap = frame.offset_ms.saturating_sub(self.cursor.position_ms);
                let wait = self.wall_wait(gap);
                self.arm(wait);
            }
            None => self.transition(PlaybackState::Finished),
        }
    }

    fn arm(&mut self, wait: Duration) {
        self.generation += 1;
        let now = self.clock.now();
        self.pending = Some(Armed {
            token: TimerToken(self.generation),
            due: now.saturating_add(wait),
            armed_at: now,
            from_ms: self.cursor.position_ms,
        });
    }

    /// Drop the pending timer, invalidating its token.
    fn cancel(&mut self) -> Option<Armed> {
        self.generation += 1;
        self.pending.take()
    }

    fn rewind(&mut self) {
        let (cols, rows) = self.size;
        self.cursor = Cursor::default();
        self.screen.reset(cols, rows);
    }

    /// Stop after a sink failure. Playback must be started again explicitly.
    fn fail(&mut self, err: SinkError) -> PlaybackError {
        warn!(%err, "terminal sink unavailable, stopping playback");
        self.cancel();
        self.remaining = None;
        self.rewind();
        self.transition(PlaybackState::Idle);
        PlaybackError::SinkUnavailable
    }

    fn transition(&mut self, to: PlaybackState) {
        if self.state != to {
            debug!(from = %self.state, %to, "playback state changed");
            self.state = to;
        }
    }

    /// Wall-clock wait for a virtual gap.
    fn wall_wait(&self, gap_ms: u64) -> Duration {
        let mut wait = Duration::from_millis(gap_ms);
        if let Some(limit) = self.idle_time_limit {
            wait = wait.min(limit);
        }
        scale(wait, 1.0 / self.speed)
    }

    fn interpolate(&self, armed: &Armed, now: Duration) -> u64 {
        let target = self
            .recording
            .frames()
            .get(self.cursor.next)
            .map_or(armed.from_ms, |f| f.offset_ms);
        let total = armed.due.saturating_sub(armed.armed_at);
        if total.is_zero() || target <= armed.from_ms {
            return armed.from_ms;
        }

        let elapsed = now.saturating_sub(armed.armed_at).min(total);
        let fraction = elapsed.as_secs_f64() / total.as_secs_f64();
        armed.from_ms + ((target - armed.from_ms) as f64 * fraction) as u64
    }
}

impl<S: TerminalSink, C: Clock> std::fmt::Debug for Scheduler<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .field("speed", &self.speed)
            .field("generation", &self.generation)
            .finish()
    }
}

fn call_sink<S: TerminalSink>(
    sink: &Weak<RefCell<S>>,
    f: impl FnOnce(&mut S) -> Result<(), SinkError>,
) -> Result<(), SinkError> {
    let sink = sink.upgrade().ok_or(SinkError::Closed)?;
    let mut sink = sink.try_borrow_mut().map_err(|_| SinkError::Closed)?;
    f(&mut sink)
}

fn apply(screen: &mut Screen, kind: &FrameKind) {
    match kind {
        FrameKind::Data(bytes) => screen.feed(bytes),
        FrameKind::Resize { cols, rows } => screen.resize(*cols, *rows),
        FrameKind::Delay => {}
    }
}

fn validate_speed(speed: f64) -> Result<(), PlaybackError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(PlaybackError::InvalidSpeed(speed))
    }
}

fn scale(wait: Duration, factor: f64) -> Duration {
    if factor == 1.0 {
        return wait;
    }
    Duration::try_from_secs_f64(wait.as_secs_f64() * factor).unwrap_or(Duration::MAX)
}

fn invalid(op: &'static str, state: PlaybackState) -> PlaybackError {
    PlaybackError::InvalidStateTransition { op, state }
}
