use clap::Subcommand;
use focusbell_core::storage::Database;
use focusbell_core::StatsAggregator;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print today's statistics as JSON
    Show,
    /// Zero today's counters
    Reset,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut stats = StatsAggregator::load(&db);

    match action {
        StatsAction::Show => {
            println!("{}", serde_json::to_string_pretty(stats.current())?);
        }
        StatsAction::Reset => {
            stats.reset_today()?;
            println!("{}", serde_json::to_string_pretty(stats.current())?);
        }
    }
    Ok(())
}
