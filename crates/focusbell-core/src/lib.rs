//! # Focusbell Core Library
//!
//! Core engine for the Focusbell Pomodoro timer: the countdown clock, the
//! focus/break phase state machine, the periodic reminder scheduler and the
//! day-scoped statistics aggregator.
//!
//! The engine is host-agnostic. It owns no threads and does no rendering:
//! hosts drive it with a one-second cadence (passing wall-clock time into
//! `tick`), persist its serialized state between invocations, and act on
//! the returned [`Event`]s -- playing cues, showing notices, updating a
//! window title.
//!
//! ## Key components
//!
//! - [`PomodoroSession`]: the coordinating state machine
//! - [`CountdownClock`]: wall-clock-anchored countdown
//! - [`ReminderScheduler`]: periodic reminders during focus phases
//! - [`StatsAggregator`]: daily statistics with durable persistence

pub mod error;
pub mod events;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod wake;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::{CueKind, Event};
pub use stats::{DailyStats, StatKind, StatsAggregator, StatsStore};
pub use storage::{Config, Database};
pub use timer::{
    ClockTick, CountdownClock, Phase, PomodoroSession, PomodoroSettings, Preset, ReminderConfig,
    ReminderScheduler, SessionState, TimerDuration,
};
