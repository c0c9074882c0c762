use std::fmt;

use serde::{Deserialize, Serialize};

/// Remaining time on the countdown face.
///
/// Always normalized so `seconds < 60`, borrowing into minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDuration {
    pub minutes: u32,
    pub seconds: u32,
}

impl TimerDuration {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes + seconds / 60,
            seconds: seconds % 60,
        }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            minutes,
            seconds: 0,
        }
    }

    pub fn from_secs(total_secs: u64) -> Self {
        Self {
            minutes: (total_secs / 60) as u32,
            seconds: (total_secs % 60) as u32,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.minutes as u64 * 60 + self.seconds as u64
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }
}

impl fmt::Display for TimerDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_overflowing_seconds() {
        let d = TimerDuration::new(1, 90);
        assert_eq!(d, TimerDuration { minutes: 2, seconds: 30 });
    }

    #[test]
    fn from_secs_round_trips_total() {
        let d = TimerDuration::from_secs(25 * 60 + 42);
        assert_eq!(d.minutes, 25);
        assert_eq!(d.seconds, 42);
        assert_eq!(d.total_secs(), 25 * 60 + 42);
    }

    #[test]
    fn displays_as_mm_ss() {
        assert_eq!(TimerDuration::new(5, 7).to_string(), "05:07");
        assert_eq!(TimerDuration::from_secs(0).to_string(), "00:00");
    }
}
