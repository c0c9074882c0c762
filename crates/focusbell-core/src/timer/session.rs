//! Pomodoro session orchestration.
//!
//! [`PomodoroSession`] is the single coordinating context that owns the
//! countdown clock, the reminder scheduler, the phase/session state and
//! the active settings. All mutation funnels through its command and tick
//! methods, which return the events the host should act on.
//!
//! The session is plain serializable state -- no threads, no callbacks.
//! Hosts persist it between invocations (the CLI keeps it in the key-value
//! store) and drive it with a one-second cadence, passing wall-clock time
//! into every call.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::events::{CueKind, Event};
use crate::stats::{StatKind, StatsAggregator, StatsStore};

use super::clock::{ClockTick, CountdownClock};
use super::duration::TimerDuration;
use super::phase::{Phase, PomodoroSettings, Preset, SessionState};
use super::reminder::{ReminderConfig, ReminderScheduler};

/// Delay between a focus completion and the automatic start of the break
/// countdown, giving the completion cue a beat before the next phase.
pub const AUTO_ADVANCE_DELAY_MS: u64 = 1_000;

/// A scheduled automatic start. Valid only while `generation` still
/// matches the session's: any user command in the delay window bumps the
/// generation and the pending start is dropped unfired.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PendingAdvance {
    at_epoch_ms: u64,
    generation: u64,
}

/// Full state snapshot for host display.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub phase_label: &'static str,
    pub session_count: u32,
    pub running: bool,
    pub remaining: TimerDuration,
    pub remaining_display: String,
    pub preset: Preset,
    pub reminder_armed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroSession {
    clock: CountdownClock,
    reminder: ReminderScheduler,
    state: SessionState,
    settings: PomodoroSettings,
    preset: Preset,
    #[serde(default)]
    pending_advance: Option<PendingAdvance>,
    /// Invalidation token for delayed work; bumped by every user command.
    #[serde(default)]
    generation: u64,
}

impl PomodoroSession {
    pub fn new(preset: Preset, custom: PomodoroSettings, reminder: ReminderConfig) -> Self {
        let settings = preset.settings().unwrap_or(custom);
        Self {
            clock: CountdownClock::new(settings.duration_for(Phase::Focus)),
            reminder: ReminderScheduler::new(reminder),
            state: SessionState::default(),
            settings,
            preset,
            pending_advance: None,
            generation: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn session_count(&self) -> u32 {
        self.state.session_count
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> PomodoroSettings {
        self.settings
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn remaining(&self) -> TimerDuration {
        self.clock.remaining()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// True while a delayed break auto-start is scheduled.
    pub fn has_pending_advance(&self) -> bool {
        matches!(self.pending_advance, Some(p) if p.generation == self.generation)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            phase_label: self.state.phase.label(),
            session_count: self.state.session_count,
            running: self.clock.is_running(),
            remaining: self.clock.remaining(),
            remaining_display: self.clock.remaining().to_string(),
            preset: self.preset,
            reminder_armed: self.reminder.is_armed(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume the countdown for the current phase.
    pub fn start(&mut self, now_ms: u64) -> Vec<Event> {
        self.generation += 1;
        if self.clock.is_running() {
            return Vec::new();
        }
        if self.clock.remaining().is_zero() {
            self.clock
                .start(self.settings.duration_for(self.state.phase), now_ms);
        } else {
            // A primed or paused clock continues from its retained value.
            self.clock.resume(now_ms);
        }
        self.reminder.sync(self.focus_running());
        vec![Event::TimerStarted {
            phase: self.state.phase,
            duration_secs: self.clock.remaining().total_secs(),
            at: Utc::now(),
        }]
    }

    /// Pause the countdown, retaining the remaining time.
    pub fn pause(&mut self, now_ms: u64) -> Vec<Event> {
        self.generation += 1;
        if !self.clock.is_running() {
            return Vec::new();
        }
        self.clock.pause(now_ms);
        self.reminder.sync(false);
        vec![Event::TimerPaused {
            remaining: self.clock.remaining(),
            at: Utc::now(),
        }]
    }

    /// Manual reset: back to a fresh focus phase with a zero session
    /// count. Statistics are untouched by this action.
    pub fn reset(&mut self) -> Vec<Event> {
        self.generation += 1;
        self.state = SessionState::default();
        self.clock.reset(self.settings.duration_for(Phase::Focus));
        self.reminder.sync(false);
        vec![Event::TimerReset { at: Utc::now() }]
    }

    /// Select a preset and, for `Custom`, its durations.
    ///
    /// A running countdown under a named preset is left undisturbed; the
    /// new durations take effect on the next reset or phase change.
    /// Otherwise the clock is re-primed (not started) with the new focus
    /// duration. The phase is not forced.
    pub fn apply_settings(&mut self, preset: Preset, custom: PomodoroSettings) -> Vec<Event> {
        self.preset = preset;
        self.settings = preset.settings().unwrap_or(custom);
        if self.clock.is_running() && preset != Preset::Custom {
            return Vec::new();
        }
        self.generation += 1;
        self.clock.reset(self.settings.duration_for(Phase::Focus));
        self.reminder.sync(false);
        vec![Event::TimerReset { at: Utc::now() }]
    }

    /// Replace the reminder configuration, re-evaluating the gating
    /// condition immediately.
    pub fn set_reminder(&mut self, config: ReminderConfig) {
        self.reminder.set_config(config);
        self.reminder.sync(self.focus_running());
    }

    // ── Cadence ──────────────────────────────────────────────────────

    /// One cadence tick. The aggregator is mutated and persisted inside
    /// this call, before any delayed auto-advance can fire, so completion
    /// side effects are fully applied ahead of the next phase starting.
    pub fn tick<S: StatsStore>(
        &mut self,
        now_ms: u64,
        stats: &mut StatsAggregator<S>,
    ) -> Result<Vec<Event>, CoreError> {
        let mut events = Vec::new();
        match self.clock.tick(now_ms) {
            ClockTick::Idle => {}
            ClockTick::Running(remaining) => {
                events.push(Event::Tick {
                    remaining,
                    at: Utc::now(),
                });
                if self.reminder.tick() {
                    stats.record(StatKind::Reminder)?;
                    events.push(Event::ReminderFired { at: Utc::now() });
                    events.push(Event::CueRequested {
                        kind: CueKind::Reminder,
                        at: Utc::now(),
                    });
                    events.push(Event::Notice {
                        title: "Reminder".into(),
                        body: "Time for a quick check-in question.".into(),
                        at: Utc::now(),
                    });
                }
            }
            ClockTick::Completed => {
                self.reminder.sync(false);
                self.on_completion(now_ms, stats, &mut events)?;
            }
        }
        self.fire_pending_advance(now_ms, &mut events);
        Ok(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn focus_running(&self) -> bool {
        self.clock.is_running() && self.state.phase == Phase::Focus
    }

    fn on_completion<S: StatsStore>(
        &mut self,
        now_ms: u64,
        stats: &mut StatsAggregator<S>,
        events: &mut Vec<Event>,
    ) -> Result<(), CoreError> {
        match self.state.phase {
            Phase::Focus => {
                self.state.session_count += 1;
                let is_long =
                    self.state.session_count % self.settings.long_break_interval == 0;
                let next = if is_long {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                };
                debug!(
                    session_count = self.state.session_count,
                    next = next.label(),
                    "focus session complete"
                );
                stats.record(StatKind::FocusComplete {
                    minutes: self.settings.focus_min,
                })?;
                self.state.phase = next;
                events.push(Event::FocusCompleted {
                    session_count: self.state.session_count,
                    next_break: next,
                    at: Utc::now(),
                });
                events.push(Event::CueRequested {
                    kind: CueKind::for_phase(next),
                    at: Utc::now(),
                });
                events.push(Event::Notice {
                    title: "Focus session complete".into(),
                    body: format!("Time for a {}.", next.label().to_lowercase()),
                    at: Utc::now(),
                });
                // Break countdowns start themselves after a short beat.
                self.pending_advance = Some(PendingAdvance {
                    at_epoch_ms: now_ms + AUTO_ADVANCE_DELAY_MS,
                    generation: self.generation,
                });
            }
            completed @ (Phase::ShortBreak | Phase::LongBreak) => {
                let minutes = match completed {
                    Phase::LongBreak => self.settings.long_break_min,
                    _ => self.settings.short_break_min,
                };
                debug!(phase = completed.label(), "break complete");
                stats.record(StatKind::BreakComplete { minutes })?;
                self.state.phase = Phase::Focus;
                // The next focus session waits for an explicit start.
                self.clock.reset(self.settings.duration_for(Phase::Focus));
                events.push(Event::BreakCompleted {
                    phase: completed,
                    at: Utc::now(),
                });
                events.push(Event::CueRequested {
                    kind: CueKind::Focus,
                    at: Utc::now(),
                });
                events.push(Event::Notice {
                    title: "Break time over".into(),
                    body: "Ready for the next focus session.".into(),
                    at: Utc::now(),
                });
            }
        }
        Ok(())
    }

    fn fire_pending_advance(&mut self, now_ms: u64, events: &mut Vec<Event>) {
        let Some(pending) = self.pending_advance else {
            return;
        };
        if pending.generation != self.generation {
            // Invalidated by a user command during the delay window.
            self.pending_advance = None;
            return;
        }
        if now_ms < pending.at_epoch_ms {
            return;
        }
        self.pending_advance = None;
        let duration = self.settings.duration_for(self.state.phase);
        self.clock.start(duration, now_ms);
        self.reminder.sync(self.focus_running());
        events.push(Event::AutoAdvanced {
            phase: self.state.phase,
            duration_secs: duration.total_secs(),
            at: Utc::now(),
        });
    }
}
