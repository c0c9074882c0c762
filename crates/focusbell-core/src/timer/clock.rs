//! Countdown clock.
//!
//! Wall-clock anchored, no internal thread: the host supplies a one-second
//! cadence and the current epoch time, and the clock reconciles remaining
//! time against real elapsed time. Throttled or missed ticks (a
//! backgrounded host, a suspended laptop) therefore never skew the
//! countdown -- the next tick catches up in one step.

use serde::{Deserialize, Serialize};

use super::duration::TimerDuration;

/// Outcome of a single cadence tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Not running; nothing happened.
    Idle,
    /// Still counting down; carries the new remaining time.
    Running(TimerDuration),
    /// Reached zero on this tick. Fired at most once per countdown:
    /// the clock stops itself before returning.
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownClock {
    remaining: TimerDuration,
    running: bool,
    /// `(epoch ms, remaining seconds)` captured at start/resume.
    /// Present only while running.
    #[serde(default)]
    anchor: Option<(u64, u64)>,
}

impl CountdownClock {
    pub fn new(duration: TimerDuration) -> Self {
        Self {
            remaining: duration,
            running: false,
            anchor: None,
        }
    }

    pub fn remaining(&self) -> TimerDuration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start counting down from `duration`. Starting while already running
    /// replaces the previous anchor (idempotent restart).
    pub fn start(&mut self, duration: TimerDuration, now_ms: u64) {
        self.remaining = duration;
        self.running = true;
        self.anchor = Some((now_ms, duration.total_secs()));
    }

    /// Stop the cadence, retaining the remaining time for a later resume.
    pub fn pause(&mut self, now_ms: u64) {
        if self.running {
            self.remaining = self.reconciled(now_ms);
            self.running = false;
            self.anchor = None;
        }
    }

    /// Continue from the retained remaining time.
    pub fn resume(&mut self, now_ms: u64) {
        if !self.running && !self.remaining.is_zero() {
            self.running = true;
            self.anchor = Some((now_ms, self.remaining.total_secs()));
        }
    }

    /// Prime the clock with `duration` without starting it. Never fires
    /// completion.
    pub fn reset(&mut self, duration: TimerDuration) {
        self.remaining = duration;
        self.running = false;
        self.anchor = None;
    }

    /// Advance against wall-clock time. Call once per cadence interval.
    pub fn tick(&mut self, now_ms: u64) -> ClockTick {
        if !self.running {
            return ClockTick::Idle;
        }
        let remaining = self.reconciled(now_ms);
        self.remaining = remaining;
        if remaining.is_zero() {
            self.running = false;
            self.anchor = None;
            ClockTick::Completed
        } else {
            ClockTick::Running(remaining)
        }
    }

    fn reconciled(&self, now_ms: u64) -> TimerDuration {
        match self.anchor {
            Some((anchor_ms, anchor_secs)) => {
                let elapsed_secs = now_ms.saturating_sub(anchor_ms) / 1000;
                TimerDuration::from_secs(anchor_secs.saturating_sub(elapsed_secs))
            }
            None => self.remaining,
        }
    }
}
