mod clock;
mod duration;
mod phase;
mod reminder;
mod session;

pub use clock::{ClockTick, CountdownClock};
pub use duration::TimerDuration;
pub use phase::{Phase, PomodoroSettings, Preset, SessionState};
pub use reminder::{ReminderConfig, ReminderScheduler};
pub use session::{PomodoroSession, Snapshot, AUTO_ADVANCE_DELAY_MS};
