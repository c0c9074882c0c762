use std::io::Write;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::Subcommand;
use focusbell_core::storage::{Config, Database};
use focusbell_core::timer::PomodoroSession;
use focusbell_core::wake::{self, NoopWakeLock};
use focusbell_core::{CueKind, Event, StatsAggregator};
use notify_rust::Notification;
use tracing::debug;

pub(crate) const SESSION_KEY: &str = "pomodoro_session";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the current phase
    Start,
    /// Pause the countdown
    Pause,
    /// Reset to a fresh focus phase (statistics are kept)
    Reset,
    /// Tick once and print the current state as JSON
    Status,
    /// Run the timer in the foreground with desktop notifications
    Watch,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

fn load_session(db: &Database, config: &Config) -> Result<PomodoroSession, Box<dyn std::error::Error>> {
    if let Ok(Some(json)) = db.kv_get(SESSION_KEY) {
        if let Ok(session) = serde_json::from_str::<PomodoroSession>(&json) {
            return Ok(session);
        }
    }
    Ok(PomodoroSession::new(
        config.preset,
        config.settings()?,
        config.reminder_config()?,
    ))
}

fn save_session(db: &Database, session: &PomodoroSession) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_set(SESSION_KEY, &serde_json::to_string(session)?)?;
    Ok(())
}

fn print_snapshot(session: &PomodoroSession) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    Ok(())
}

/// Render the core's events: notices become desktop notifications, cues a
/// terminal bell, ticks a title update. The core decided when and which;
/// this is only the how.
fn render_events(config: &Config, session: &PomodoroSession, events: &[Event]) {
    for event in events {
        match event {
            Event::Tick { remaining, .. } => {
                print!("\x1b]0;{} {}\x07", session.phase().label(), remaining);
                print!("\r{} {}  ", session.phase().label(), remaining);
                let _ = std::io::stdout().flush();
            }
            Event::Notice { title, body, .. } => notify(config, title, body),
            Event::CueRequested { kind, .. } => cue(config, *kind),
            _ => {}
        }
    }
}

fn notify(config: &Config, title: &str, body: &str) {
    if !config.notifications.enabled {
        return;
    }
    if let Err(e) = Notification::new()
        .appname("focusbell")
        .summary(title)
        .body(body)
        .show()
    {
        debug!("notification failed: {e}");
    }
}

fn cue(config: &Config, kind: CueKind) {
    if !config.notifications.enabled {
        return;
    }
    // Terminal bell as the audible cue; which bell rang is in the log.
    debug!(?kind, "cue");
    print!("\x07");
    let _ = std::io::stdout().flush();
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut session = load_session(&db, &config)?;
    let mut stats = StatsAggregator::load(&db);

    match action {
        TimerAction::Start => {
            let events = session.start(now_ms());
            render_events(&config, &session, &events);
            print_snapshot(&session)?;
        }
        TimerAction::Pause => {
            let events = session.pause(now_ms());
            render_events(&config, &session, &events);
            print_snapshot(&session)?;
        }
        TimerAction::Reset => {
            session.reset();
            print_snapshot(&session)?;
        }
        TimerAction::Status => {
            let events = session.tick(now_ms(), &mut stats)?;
            render_events(&config, &session, &events);
            print_snapshot(&session)?;
        }
        TimerAction::Watch => {
            watch(&db, &config, &mut session, &mut stats)?;
        }
    }

    save_session(&db, &session)?;
    Ok(())
}

/// Foreground loop: one-second cadence, persisting state every tick so a
/// killed process resumes where it left off.
fn watch(
    db: &Database,
    config: &Config,
    session: &mut PomodoroSession,
    stats: &mut StatsAggregator<&Database>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lock = NoopWakeLock::default();

    let events = session.start(now_ms());
    wake::apply_events(&mut lock, &events);
    render_events(config, session, &events);

    loop {
        std::thread::sleep(Duration::from_secs(1));
        let events = session.tick(now_ms(), stats)?;
        wake::apply_events(&mut lock, &events);
        render_events(config, session, &events);
        save_session(db, session)?;

        // A completed break leaves the next focus session waiting for an
        // explicit start; hand the terminal back.
        if !session.is_running() && !session.has_pending_advance() {
            println!();
            print_snapshot(session)?;
            break;
        }
    }
    Ok(())
}
