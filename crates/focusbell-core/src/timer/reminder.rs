//! Periodic reminder scheduler.
//!
//! Counts down its own interval alongside the clock cadence and fires only
//! while all three gating conditions hold: the feature is enabled, the
//! clock is running, and the active phase is Focus. Leaving that combined
//! condition disarms the scheduler and zeroes its countdown.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub enabled: bool,
    pub interval_secs: u32,
}

impl ReminderConfig {
    /// Validated constructor. A zero interval would fire immediately on
    /// every tick, so it is rejected here.
    pub fn new(enabled: bool, interval_secs: u32) -> Result<Self, ValidationError> {
        if interval_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "reminder.interval_secs",
                message: "must be at least 1 second".into(),
            });
        }
        Ok(Self {
            enabled,
            interval_secs,
        })
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderScheduler {
    config: ReminderConfig,
    countdown_secs: u32,
    armed: bool,
}

impl ReminderScheduler {
    pub fn new(config: ReminderConfig) -> Self {
        Self {
            config,
            countdown_secs: 0,
            armed: false,
        }
    }

    pub fn config(&self) -> ReminderConfig {
        self.config
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn countdown_secs(&self) -> u32 {
        self.countdown_secs
    }

    /// Replace the configuration. An armed scheduler rearms with the new
    /// interval, or disarms if the feature was switched off.
    pub fn set_config(&mut self, config: ReminderConfig) {
        self.config = config;
        if self.armed {
            if config.enabled {
                self.countdown_secs = config.interval_secs;
            } else {
                self.disarm();
            }
        }
    }

    /// Arm or disarm on edges of the combined gating condition.
    /// `focus_running` is "clock running and phase is Focus".
    pub fn sync(&mut self, focus_running: bool) {
        let active = self.config.enabled && focus_running;
        if active && !self.armed {
            self.armed = true;
            self.countdown_secs = self.config.interval_secs;
        } else if !active && self.armed {
            self.disarm();
        }
    }

    /// One cadence tick. Returns true when the reminder fires (and the
    /// countdown rearms to the full interval).
    pub fn tick(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        if self.countdown_secs <= 1 {
            self.countdown_secs = self.config.interval_secs;
            true
        } else {
            self.countdown_secs -= 1;
            false
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.countdown_secs = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled(interval: u32) -> ReminderConfig {
        ReminderConfig::new(true, interval).unwrap()
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(ReminderConfig::new(true, 0).is_err());
    }

    #[test]
    fn fires_exactly_once_per_interval() {
        let mut sched = ReminderScheduler::new(enabled(300));
        sched.sync(true);
        let mut fired = 0;
        for _ in 0..900 {
            if sched.tick() {
                fired += 1;
            }
        }
        assert_eq!(fired, 3);
    }

    #[test]
    fn never_fires_while_disarmed() {
        let mut sched = ReminderScheduler::new(enabled(10));
        for _ in 0..100 {
            assert!(!sched.tick());
        }
        // Disabled feature never arms.
        let mut off = ReminderScheduler::new(ReminderConfig::default());
        off.sync(true);
        assert!(!off.is_armed());
    }

    #[test]
    fn leaving_the_condition_zeroes_the_countdown() {
        let mut sched = ReminderScheduler::new(enabled(60));
        sched.sync(true);
        for _ in 0..30 {
            sched.tick();
        }
        sched.sync(false);
        assert_eq!(sched.countdown_secs(), 0);
        // Rearming starts from the full interval again.
        sched.sync(true);
        assert_eq!(sched.countdown_secs(), 60);
    }

    #[test]
    fn set_config_rearms_with_new_interval() {
        let mut sched = ReminderScheduler::new(enabled(60));
        sched.sync(true);
        for _ in 0..50 {
            sched.tick();
        }
        sched.set_config(enabled(120));
        assert_eq!(sched.countdown_secs(), 120);
        sched.set_config(ReminderConfig::new(false, 120).unwrap());
        assert!(!sched.is_armed());
    }
}
