//! Recording playback.
//!
//! # Architecture
//!
//! The player is organized into submodules:
//! - `scheduler`: the playback state machine emitting frames into a sink
//! - `state`: playback states, cursor, options and timer types
//! - `clock`: time sources (monotonic for real playback, manual for tests)
//! - `sink`: the terminal output sink trait and the provided sinks
//! - `input/`: keyboard controls for interactive hosts
//!
//! The scheduler never sleeps. Hosts wait until
//! [`Scheduler::pending_timer`] is due and hand the token back through
//! [`Scheduler::on_timer`].
//!
//! # Usage
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use termreplay::player::{CaptureSink, ManualClock, PlaybackOptions, Scheduler, Tick};
//! use termreplay::recording::{Frame, Recording};
//!
//! let recording = Recording::new(vec![Frame::data(0, "abc"), Frame::data(700, "def")]).unwrap();
//! let sink = Rc::new(RefCell::new(CaptureSink::new()));
//! let clock = ManualClock::new();
//! let mut scheduler =
//!     Scheduler::new(recording, &sink, clock.clone(), PlaybackOptions::default()).unwrap();
//!
//! scheduler.start().unwrap();
//! while let Some(timer) = scheduler.pending_timer() {
//!     clock.set(timer.due);
//!     if let Tick::Finished { .. } = scheduler.on_timer(timer.token).unwrap() {
//!         break;
//!     }
//! }
//! assert_eq!(sink.borrow().writes(), vec!["abc", "def"]);
//! ```

pub mod clock;
mod error;
pub mod input;
mod scheduler;
pub mod sink;
pub mod state;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::PlaybackError;
pub use scheduler::Scheduler;
pub use sink::{AnsiWriterSink, CaptureSink, SinkCall, SinkError, TerminalSink};
pub use state::{Cursor, PendingTimer, PlaybackOptions, PlaybackState, Tick, TimerToken};
