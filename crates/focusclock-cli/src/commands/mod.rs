pub mod config;
pub mod run;
pub mod stats;

use std::error::Error;

use chrono::Utc;
use focusclock_core::{Config, Database, ProductivityTracker, RolloverOutcome, StreakRollover};

/// Load the stored tracker (or a fresh one from config) and roll the streak
/// over to today. The result is saved before it is returned.
pub(crate) fn load_tracker(
    db: &Database,
    config: &Config,
) -> Result<(ProductivityTracker, RolloverOutcome), Box<dyn Error>> {
    let mut tracker = match db.load_tracker()? {
        Some(tracker) => tracker,
        None => config.new_tracker()?,
    };

    let today = Utc::now().date_naive();
    let last_day = db.last_rollover_day()?;
    let focus_on_last_day = match last_day {
        Some(day) => db.focus_minutes_on(day)?,
        None => 0,
    };
    let update = StreakRollover::decide(
        last_day,
        today,
        focus_on_last_day,
        tracker.daily_goal_minutes(),
    );
    let outcome = StreakRollover::apply(update, &mut tracker);

    if last_day.map_or(true, |day| day < today) {
        db.set_last_rollover_day(today)?;
    }
    db.save_tracker(&tracker)?;
    Ok((tracker, outcome))
}
