//! TOML-based application configuration.
//!
//! Stores the active preset, the custom durations, the reminder settings
//! and the notification preference at `~/.config/focusbell/config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ValidationError};
use crate::timer::{PomodoroSettings, Preset, ReminderConfig};

use super::data_dir;

/// User-editable durations, used only while the `custom` preset is active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationsConfig {
    #[serde(default = "default_focus")]
    pub focus_min: u32,
    #[serde(default = "default_short_break")]
    pub short_break_min: u32,
    #[serde(default = "default_long_break")]
    pub long_break_min: u32,
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
}

/// Periodic reminder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_reminder_interval")]
    pub interval_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusbell/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub preset: Preset,
    #[serde(default)]
    pub custom: DurationsConfig,
    #[serde(default)]
    pub reminder: ReminderSection,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_focus() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_reminder_interval() -> u32 {
    300
}
fn default_true() -> bool {
    true
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            focus_min: default_focus(),
            short_break_min: default_short_break(),
            long_break_min: default_long_break(),
            long_break_interval: default_long_break_interval(),
        }
    }
}

impl Default for ReminderSection {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_reminder_interval(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            custom: DurationsConfig::default(),
            reminder: ReminderSection::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Durations for the active preset, validated.
    pub fn settings(&self) -> Result<PomodoroSettings, ValidationError> {
        match self.preset.settings() {
            Some(fixed) => Ok(fixed),
            None => PomodoroSettings::new(
                self.custom.focus_min,
                self.custom.short_break_min,
                self.custom.long_break_min,
                self.custom.long_break_interval,
            ),
        }
    }

    /// Reminder feature settings, validated.
    pub fn reminder_config(&self) -> Result<ReminderConfig, ValidationError> {
        ReminderConfig::new(self.reminder.enabled, self.reminder.interval_secs)
    }

    /// Get a single value by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "preset" => Some(self.preset.as_str().to_string()),
            "custom.focus_min" => Some(self.custom.focus_min.to_string()),
            "custom.short_break_min" => Some(self.custom.short_break_min.to_string()),
            "custom.long_break_min" => Some(self.custom.long_break_min.to_string()),
            "custom.long_break_interval" => Some(self.custom.long_break_interval.to_string()),
            "reminder.enabled" => Some(self.reminder.enabled.to_string()),
            "reminder.interval_secs" => Some(self.reminder.interval_secs.to_string()),
            "notifications.enabled" => Some(self.notifications.enabled.to_string()),
            _ => None,
        }
    }

    /// Set a value by key and persist. Durations and intervals are
    /// validated here, at the settings-entry boundary.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "preset" => {
                self.preset = value.parse().map_err(|e: ValidationError| {
                    ConfigError::InvalidValue {
                        key: key.into(),
                        message: e.to_string(),
                    }
                })?;
            }
            "custom.focus_min" => self.custom.focus_min = parse_positive(key, value)?,
            "custom.short_break_min" => self.custom.short_break_min = parse_positive(key, value)?,
            "custom.long_break_min" => self.custom.long_break_min = parse_positive(key, value)?,
            "custom.long_break_interval" => {
                self.custom.long_break_interval = parse_positive(key, value)?
            }
            "reminder.enabled" => self.reminder.enabled = parse_bool(key, value)?,
            "reminder.interval_secs" => self.reminder.interval_secs = parse_positive(key, value)?,
            "notifications.enabled" => self.notifications.enabled = parse_bool(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.into())),
        }
        self.save()
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u32, ConfigError> {
    let parsed: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.into(),
        message: format!("cannot parse '{value}' as a positive integer"),
    })?;
    if parsed == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.into(),
            message: "must be at least 1".into(),
        });
    }
    Ok(parsed)
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.into(),
        message: format!("cannot parse '{value}' as a boolean"),
    })
}
