//! Best-effort screen-stay-awake handling.
//!
//! The timer never depends on the wake lock: acquisition failures are
//! swallowed by implementations and releasing an unheld lock is a no-op.
//! Hosts engage the lock from the event stream -- acquire while a
//! countdown runs, release on pause, reset or completion.

use tracing::debug;

use crate::events::Event;

pub trait WakeLock {
    /// Best effort; implementations log and swallow failures.
    fn acquire(&mut self);
    /// No-op when not held.
    fn release(&mut self);
}

/// Apply a tick's events to a wake lock.
pub fn apply_events(lock: &mut dyn WakeLock, events: &[Event]) {
    for event in events {
        match event {
            Event::TimerStarted { .. } | Event::AutoAdvanced { .. } => lock.acquire(),
            Event::TimerPaused { .. }
            | Event::TimerReset { .. }
            | Event::FocusCompleted { .. }
            | Event::BreakCompleted { .. } => lock.release(),
            _ => {}
        }
    }
}

/// Default lock for hosts without a platform hook.
#[derive(Debug, Default)]
pub struct NoopWakeLock {
    held: bool,
}

impl NoopWakeLock {
    pub fn is_held(&self) -> bool {
        self.held
    }
}

impl WakeLock for NoopWakeLock {
    fn acquire(&mut self) {
        if !self.held {
            self.held = true;
            debug!("wake lock acquired");
        }
    }

    fn release(&mut self) {
        if self.held {
            self.held = false;
            debug!("wake lock released");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::timer::{Phase, TimerDuration};

    #[test]
    fn held_across_start_and_released_on_pause() {
        let mut lock = NoopWakeLock::default();
        apply_events(
            &mut lock,
            &[Event::TimerStarted {
                phase: Phase::Focus,
                duration_secs: 60,
                at: Utc::now(),
            }],
        );
        assert!(lock.is_held());
        apply_events(
            &mut lock,
            &[Event::TimerPaused {
                remaining: TimerDuration::from_secs(30),
                at: Utc::now(),
            }],
        );
        assert!(!lock.is_held());
        // Releasing again is a no-op.
        lock.release();
        assert!(!lock.is_held());
    }

    #[test]
    fn completion_followed_by_auto_advance_reacquires() {
        let mut lock = NoopWakeLock::default();
        lock.acquire();
        apply_events(
            &mut lock,
            &[
                Event::FocusCompleted {
                    session_count: 1,
                    next_break: Phase::ShortBreak,
                    at: Utc::now(),
                },
                Event::AutoAdvanced {
                    phase: Phase::ShortBreak,
                    duration_secs: 300,
                    at: Utc::now(),
                },
            ],
        );
        assert!(lock.is_held());
    }
}
