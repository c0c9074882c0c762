use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

use super::duration::TimerDuration;

/// The activity kind currently being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn is_break(&self) -> bool {
        matches!(self, Phase::ShortBreak | Phase::LongBreak)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

/// Current phase plus the number of completed focus sessions.
///
/// `session_count` increments only when a focus countdown completes and
/// resets to zero only on an explicit manual reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub session_count: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Focus,
            session_count: 0,
        }
    }
}

/// Phase durations and the long-break interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    pub focus_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
    /// Every Nth completed focus session earns a long break.
    pub long_break_interval: u32,
}

impl PomodoroSettings {
    /// Validated constructor; every field must be at least 1.
    pub fn new(
        focus_min: u32,
        short_break_min: u32,
        long_break_min: u32,
        long_break_interval: u32,
    ) -> Result<Self, ValidationError> {
        let check = |field: &'static str, value: u32| {
            if value == 0 {
                Err(ValidationError::InvalidValue {
                    field,
                    message: "must be at least 1".into(),
                })
            } else {
                Ok(value)
            }
        };
        Ok(Self {
            focus_min: check("focus_min", focus_min)?,
            short_break_min: check("short_break_min", short_break_min)?,
            long_break_min: check("long_break_min", long_break_min)?,
            long_break_interval: check("long_break_interval", long_break_interval)?,
        })
    }

    pub fn classic() -> Self {
        Self {
            focus_min: 25,
            short_break_min: 5,
            long_break_min: 15,
            long_break_interval: 4,
        }
    }

    pub fn extended() -> Self {
        Self {
            focus_min: 50,
            short_break_min: 10,
            long_break_min: 30,
            long_break_interval: 2,
        }
    }

    pub fn duration_for(&self, phase: Phase) -> TimerDuration {
        let minutes = match phase {
            Phase::Focus => self.focus_min,
            Phase::ShortBreak => self.short_break_min,
            Phase::LongBreak => self.long_break_min,
        };
        TimerDuration::from_minutes(minutes)
    }
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self::classic()
    }
}

/// A named duration bundle. The named presets are fixed; only `Custom`
/// is user-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Classic,
    Extended,
    Custom,
}

impl Preset {
    /// The fixed bundle for a named preset; `None` for `Custom`, whose
    /// durations live in configuration.
    pub fn settings(&self) -> Option<PomodoroSettings> {
        match self {
            Preset::Classic => Some(PomodoroSettings::classic()),
            Preset::Extended => Some(PomodoroSettings::extended()),
            Preset::Custom => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "classic",
            Preset::Extended => "extended",
            Preset::Custom => "custom",
        }
    }
}

impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classic" => Ok(Preset::Classic),
            "extended" => Ok(Preset::Extended),
            "custom" => Ok(Preset::Custom),
            other => Err(ValidationError::InvalidValue {
                field: "preset",
                message: format!("unknown preset '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_reject_zero_values() {
        assert!(PomodoroSettings::new(0, 5, 15, 4).is_err());
        assert!(PomodoroSettings::new(25, 5, 15, 0).is_err());
        assert!(PomodoroSettings::new(25, 5, 15, 4).is_ok());
    }

    #[test]
    fn duration_for_maps_phase_to_minutes() {
        let s = PomodoroSettings::classic();
        assert_eq!(s.duration_for(Phase::Focus), TimerDuration::from_minutes(25));
        assert_eq!(
            s.duration_for(Phase::LongBreak),
            TimerDuration::from_minutes(15)
        );
    }

    #[test]
    fn named_presets_are_fixed_and_custom_is_not() {
        assert!(Preset::Classic.settings().is_some());
        assert!(Preset::Extended.settings().is_some());
        assert!(Preset::Custom.settings().is_none());
    }

    #[test]
    fn preset_parses_from_str() {
        assert_eq!("classic".parse::<Preset>().unwrap(), Preset::Classic);
        assert!("pomodoro".parse::<Preset>().is_err());
    }
}
