use clap::Subcommand;
use focusbell_core::storage::{Config, Database};
use focusbell_core::timer::PomodoroSession;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as TOML
    Show,
    /// Get a single value
    Get { key: String },
    /// Set a value and apply it to the stored session
    Set { key: String, value: String },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();

    match action {
        ConfigAction::Show => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown config key: {key}").into()),
        },
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            apply_to_session(&config)?;
            println!("{key} = {value}");
        }
    }
    Ok(())
}

/// Push the new settings into the persisted session. A running countdown
/// under a named preset is left undisturbed by the core; everything else
/// is re-primed with the new durations.
fn apply_to_session(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let Some(json) = db.kv_get(super::timer::SESSION_KEY)? else {
        return Ok(());
    };
    let Ok(mut session) = serde_json::from_str::<PomodoroSession>(&json) else {
        return Ok(());
    };
    session.apply_settings(config.preset, config.settings()?);
    session.set_reminder(config.reminder_config()?);
    db.kv_set(
        super::timer::SESSION_KEY,
        &serde_json::to_string(&session)?,
    )?;
    Ok(())
}
