use std::error::Error;

use chrono::Utc;
use clap::Subcommand;
use focusclock_core::{Config, Database, ProductivityStats, ScoreBreakdown};
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Counters, score and score breakdown
    Show,
    /// Sessions completed today (UTC)
    Today,
    /// Recently completed sessions
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Set the daily focus goal in minutes
    Goal {
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Report the streak rollover applied for today
    Rollover,
}

#[derive(Serialize)]
struct StatsView {
    #[serde(flatten)]
    stats: ProductivityStats,
    productivity_score: u8,
    breakdown: ScoreBreakdown,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let (mut tracker, outcome) = super::load_tracker(&db, &config)?;

    match action {
        StatsAction::Show => {
            let view = StatsView {
                stats: *tracker.stats(),
                productivity_score: tracker.score(),
                breakdown: tracker.breakdown(),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        StatsAction::Today => {
            let summary = db.day_summary(Utc::now().date_naive())?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::History { limit } => {
            let records = db.recent_sessions(limit)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        StatsAction::Goal { minutes } => {
            tracker.set_daily_goal(minutes)?;
            db.save_tracker(&tracker)?;
            println!(
                "daily goal set to {} minutes (score {})",
                tracker.daily_goal_minutes(),
                tracker.score()
            );
        }
        StatsAction::Rollover => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }
    Ok(())
}
