//! End-to-end walk of the focus/break cycle against synthetic time,
//! exercising the session state machine, the reminder scheduler and the
//! statistics aggregator together the way a host drives them.

use focusbell_core::stats::{MemoryStatsStore, StatsAggregator, StatsStore};
use focusbell_core::timer::{
    Phase, PomodoroSession, PomodoroSettings, Preset, ReminderConfig, TimerDuration,
};
use focusbell_core::wake::{self, NoopWakeLock};
use focusbell_core::Event;

const T0: u64 = 1_700_000_000_000;

struct Harness {
    session: PomodoroSession,
    stats: StatsAggregator<MemoryStatsStore>,
    wake: NoopWakeLock,
    now_secs: u64,
}

impl Harness {
    fn new(settings: PomodoroSettings, reminder: ReminderConfig) -> Self {
        Self {
            session: PomodoroSession::new(Preset::Custom, settings, reminder),
            stats: StatsAggregator::load(MemoryStatsStore::default()),
            wake: NoopWakeLock::default(),
            now_secs: 0,
        }
    }

    fn now_ms(&self) -> u64 {
        T0 + self.now_secs * 1000
    }

    fn start(&mut self) {
        let events = self.session.start(self.now_ms());
        wake::apply_events(&mut self.wake, &events);
    }

    /// Advance one second and tick, collecting the events.
    fn tick(&mut self) -> Vec<Event> {
        self.now_secs += 1;
        let events = self.session.tick(self.now_ms(), &mut self.stats).unwrap();
        wake::apply_events(&mut self.wake, &events);
        events
    }

    fn tick_for(&mut self, secs: u64) -> Vec<Event> {
        let mut all = Vec::new();
        for _ in 0..secs {
            all.extend(self.tick());
        }
        all
    }
}

fn count<F: Fn(&Event) -> bool>(events: &[Event], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[test]
fn full_day_cycle_with_reminders() {
    let settings = PomodoroSettings::new(2, 1, 2, 2).unwrap();
    let reminder = ReminderConfig::new(true, 45).unwrap();
    let mut h = Harness::new(settings, reminder);

    // First focus session: 120 ticks, reminders at 45 and 90.
    h.start();
    assert!(h.wake.is_held());
    let events = h.tick_for(120);
    assert_eq!(count(&events, |e| matches!(e, Event::ReminderFired { .. })), 2);
    assert_eq!(
        count(&events, |e| matches!(
            e,
            Event::FocusCompleted { next_break: Phase::ShortBreak, .. }
        )),
        1
    );
    assert_eq!(h.session.phase(), Phase::ShortBreak);
    assert!(!h.wake.is_held(), "released on completion");

    // The short break auto-starts after the delay and runs out on its own.
    let events = h.tick_for(61);
    assert_eq!(count(&events, |e| matches!(e, Event::AutoAdvanced { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, Event::BreakCompleted { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, Event::ReminderFired { .. })), 0);
    assert_eq!(h.session.phase(), Phase::Focus);
    assert!(!h.session.is_running(), "focus waits for a manual start");

    // Second focus session earns the long break (interval 2).
    h.start();
    let events = h.tick_for(120);
    assert_eq!(
        count(&events, |e| matches!(
            e,
            Event::FocusCompleted { next_break: Phase::LongBreak, .. }
        )),
        1
    );
    assert_eq!(h.session.session_count(), 2);

    // Long break: auto-start plus 120 seconds.
    let events = h.tick_for(121);
    assert_eq!(count(&events, |e| matches!(e, Event::BreakCompleted { phase: Phase::LongBreak, .. })), 1);

    let day = h.stats.current();
    assert_eq!(day.completed_sessions, 2);
    assert_eq!(day.total_focus_min, 4);
    assert_eq!(day.total_break_min, 3);
    assert_eq!(day.reminder_count, 4);
}

#[test]
fn tick_feed_reaches_the_display_collaborator_every_second() {
    let settings = PomodoroSettings::new(1, 1, 1, 4).unwrap();
    let mut h = Harness::new(settings, ReminderConfig::default());
    h.start();

    let events = h.tick_for(59);
    let ticks: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Tick { remaining, .. } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(ticks.len(), 59);
    assert_eq!(ticks[0], TimerDuration::from_secs(59));
    assert_eq!(ticks[58], TimerDuration::from_secs(1));
}

#[test]
fn stats_survive_a_host_restart_but_not_a_day_change() {
    let store = MemoryStatsStore::default();
    {
        let mut stats = StatsAggregator::load(&store);
        let mut session = PomodoroSession::new(
            Preset::Custom,
            PomodoroSettings::new(1, 1, 1, 4).unwrap(),
            ReminderConfig::default(),
        );
        session.start(T0);
        session.tick(T0 + 60_000, &mut stats).unwrap();
        assert_eq!(stats.current().completed_sessions, 1);
    }
    // Same day: the record is still there after a reload.
    let stats = StatsAggregator::load(&store);
    assert_eq!(stats.current().completed_sessions, 1);
    assert_eq!(stats.current().total_focus_min, 1);

    // A record stamped with another day is discarded wholesale.
    let stale = store.load().unwrap().unwrap().replace(
        &focusbell_core::stats::today_key(),
        "2019-12-31",
    );
    let stale_store = MemoryStatsStore::with_record(&stale);
    let stats = StatsAggregator::load(stale_store);
    assert_eq!(stats.current().completed_sessions, 0);
}

#[test]
fn serialized_session_resumes_mid_countdown() {
    let mut h = Harness::new(
        PomodoroSettings::new(1, 1, 1, 4).unwrap(),
        ReminderConfig::default(),
    );
    h.start();
    h.tick_for(20);

    // Host shuts down, persists, comes back later.
    let json = serde_json::to_string(&h.session).unwrap();
    let mut restored: PomodoroSession = serde_json::from_str(&json).unwrap();
    let mut stats = StatsAggregator::load(MemoryStatsStore::default());

    // The remaining 40 seconds elapse while the host is down; the
    // countdown completes on the first tick after restore.
    let events = restored.tick(T0 + 60_000, &mut stats).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::FocusCompleted { .. })));
}
