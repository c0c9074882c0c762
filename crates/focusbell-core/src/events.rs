use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerDuration};

/// Which audio/notification cue the host should produce. The core decides
/// when and which; the host decides how it sounds or renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    Focus,
    ShortBreak,
    LongBreak,
    Reminder,
}

impl CueKind {
    pub fn for_phase(phase: Phase) -> Self {
        match phase {
            Phase::Focus => CueKind::Focus,
            Phase::ShortBreak => CueKind::ShortBreak,
            Phase::LongBreak => CueKind::LongBreak,
        }
    }
}

/// Every state change in the engine produces an Event. Hosts render,
/// notify, or log them; the core never waits on delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// One second of countdown progress; input for the display/title
    /// collaborator.
    Tick {
        remaining: TimerDuration,
        at: DateTime<Utc>,
    },
    TimerStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining: TimerDuration,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    FocusCompleted {
        session_count: u32,
        next_break: Phase,
        at: DateTime<Utc>,
    },
    BreakCompleted {
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// The delayed automatic start of a break countdown.
    AutoAdvanced {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    ReminderFired {
        at: DateTime<Utc>,
    },
    CueRequested {
        kind: CueKind,
        at: DateTime<Utc>,
    },
    /// User-facing feed entry; rendering and delivery are external.
    Notice {
        title: String,
        body: String,
        at: DateTime<Utc>,
    },
}
