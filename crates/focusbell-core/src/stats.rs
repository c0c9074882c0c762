//! Day-scoped usage statistics.
//!
//! One record per calendar day, persisted as JSON under a fixed key in the
//! host's key-value store. The record is discarded and reinitialized when
//! the stored day no longer matches today, and every mutation is persisted
//! immediately.

use std::cell::RefCell;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;

/// What a phase completion or reminder contributes to the daily record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    FocusComplete { minutes: u32 },
    BreakComplete { minutes: u32 },
    Reminder,
}

/// One calendar day's accumulated usage. Serde names follow the stored
/// wire shape; time fields are minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    #[serde(rename = "totalFocusTime")]
    pub total_focus_min: u32,
    #[serde(rename = "totalBreakTime")]
    pub total_break_min: u32,
    #[serde(rename = "completedSessions")]
    pub completed_sessions: u32,
    #[serde(rename = "mcqReminders")]
    pub reminder_count: u32,
    /// Device-local day key, `YYYY-MM-DD`.
    #[serde(rename = "todayDate")]
    pub date_key: String,
}

impl DailyStats {
    pub fn fresh(date_key: String) -> Self {
        Self {
            total_focus_min: 0,
            total_break_min: 0,
            completed_sessions: 0,
            reminder_count: 0,
            date_key,
        }
    }
}

/// Today's key in the device-local calendar.
pub fn today_key() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Durable slot for the daily record.
pub trait StatsStore {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, json: &str) -> Result<(), StorageError>;
}

impl<S: StatsStore + ?Sized> StatsStore for &S {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, json: &str) -> Result<(), StorageError> {
        (**self).save(json)
    }
}

/// In-memory store for tests and stateless hosts.
#[derive(Debug, Default)]
pub struct MemoryStatsStore(RefCell<Option<String>>);

impl MemoryStatsStore {
    pub fn with_record(json: &str) -> Self {
        Self(RefCell::new(Some(json.to_string())))
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.0.borrow().clone())
    }

    fn save(&self, json: &str) -> Result<(), StorageError> {
        *self.0.borrow_mut() = Some(json.to_string());
        Ok(())
    }
}

/// Accumulates the day's counters and persists after every mutation.
pub struct StatsAggregator<S: StatsStore> {
    stats: DailyStats,
    store: S,
}

impl<S: StatsStore> StatsAggregator<S> {
    /// Load the persisted record, discarding anything malformed or from a
    /// previous day.
    pub fn load(store: S) -> Self {
        let today = today_key();
        let stats = match store.load() {
            Ok(Some(json)) => match serde_json::from_str::<DailyStats>(&json) {
                Ok(record) if record.date_key == today => record,
                Ok(record) => {
                    debug!(stale = %record.date_key, "discarding statistics from a previous day");
                    DailyStats::fresh(today)
                }
                Err(err) => {
                    warn!(%err, "persisted statistics unreadable, reinitializing");
                    DailyStats::fresh(today)
                }
            },
            Ok(None) => DailyStats::fresh(today),
            Err(err) => {
                warn!(%err, "failed to read persisted statistics, reinitializing");
                DailyStats::fresh(today)
            }
        };
        Self { stats, store }
    }

    pub fn current(&self) -> &DailyStats {
        &self.stats
    }

    /// Apply one completion or reminder and persist the full record.
    pub fn record(&mut self, kind: StatKind) -> Result<(), StorageError> {
        self.rollover_if_needed();
        match kind {
            StatKind::FocusComplete { minutes } => {
                self.stats.total_focus_min += minutes;
                self.stats.completed_sessions += 1;
            }
            StatKind::BreakComplete { minutes } => {
                self.stats.total_break_min += minutes;
            }
            StatKind::Reminder => {
                self.stats.reminder_count += 1;
            }
        }
        self.persist()
    }

    /// Zero all counters and restamp today. Available at any time,
    /// regardless of timer state.
    pub fn reset_today(&mut self) -> Result<(), StorageError> {
        self.stats = DailyStats::fresh(today_key());
        self.persist()
    }

    /// A long-running host can cross midnight between loads.
    fn rollover_if_needed(&mut self) {
        let today = today_key();
        if self.stats.date_key != today {
            debug!(from = %self.stats.date_key, "day rolled over, resetting statistics");
            self.stats = DailyStats::fresh(today);
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.stats)?;
        self.store.save(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_record_initializes_to_zero_today() {
        let agg = StatsAggregator::load(MemoryStatsStore::default());
        assert_eq!(agg.current(), &DailyStats::fresh(today_key()));
    }

    #[test]
    fn stale_record_is_discarded_at_load() {
        let stale = DailyStats {
            total_focus_min: 100,
            total_break_min: 20,
            completed_sessions: 4,
            reminder_count: 7,
            date_key: "2020-01-01".into(),
        };
        let store = MemoryStatsStore::with_record(&serde_json::to_string(&stale).unwrap());
        let agg = StatsAggregator::load(store);
        assert_eq!(agg.current(), &DailyStats::fresh(today_key()));
    }

    #[test]
    fn malformed_record_is_treated_as_absent() {
        let store = MemoryStatsStore::with_record("{not json");
        let agg = StatsAggregator::load(store);
        assert_eq!(agg.current().completed_sessions, 0);
        assert_eq!(agg.current().date_key, today_key());
    }

    #[test]
    fn record_mutates_and_persists() {
        let mut agg = StatsAggregator::load(MemoryStatsStore::default());
        agg.record(StatKind::FocusComplete { minutes: 25 }).unwrap();
        agg.record(StatKind::BreakComplete { minutes: 5 }).unwrap();
        agg.record(StatKind::Reminder).unwrap();
        assert_eq!(agg.current().total_focus_min, 25);
        assert_eq!(agg.current().completed_sessions, 1);
        assert_eq!(agg.current().total_break_min, 5);
        assert_eq!(agg.current().reminder_count, 1);

        // The persisted record reflects every mutation.
        let json = agg.store.load().unwrap().unwrap();
        let persisted: DailyStats = serde_json::from_str(&json).unwrap();
        assert_eq!(&persisted, agg.current());
    }

    #[test]
    fn reset_today_zeroes_and_restamps() {
        let mut agg = StatsAggregator::load(MemoryStatsStore::default());
        agg.record(StatKind::FocusComplete { minutes: 25 }).unwrap();
        agg.reset_today().unwrap();
        assert_eq!(agg.current(), &DailyStats::fresh(today_key()));
    }

    #[test]
    fn wire_shape_uses_the_fixed_field_names() {
        let json = serde_json::to_string(&DailyStats::fresh("2024-06-01".into())).unwrap();
        for field in [
            "totalFocusTime",
            "totalBreakTime",
            "completedSessions",
            "mcqReminders",
            "todayDate",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
    }
}
