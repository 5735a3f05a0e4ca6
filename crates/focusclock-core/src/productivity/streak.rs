//! Day-rollover streak policy.
//!
//! The tracker only stores the streak and exposes an additive primitive.
//! This module decides, once per calendar day, whether yesterday extends
//! the streak or breaks it: the streak grows when the last active day met
//! the daily goal and today is the very next day; a missed goal or a skipped
//! day resets it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::tracker::ProductivityTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakUpdate {
    /// Same day, or no previous day on record.
    Unchanged,
    Extend,
    Reset,
}

/// Outcome of one rollover, for logging and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloverOutcome {
    pub update: StreakUpdate,
    pub streak_before: u32,
    pub streak_after: u32,
}

pub struct StreakRollover;

impl StreakRollover {
    /// Decide how the streak moves between `last_day` and `today`.
    ///
    /// `focus_minutes_on_last_day` is the focus time recorded on `last_day`.
    pub fn decide(
        last_day: Option<NaiveDate>,
        today: NaiveDate,
        focus_minutes_on_last_day: u64,
        daily_goal_minutes: u32,
    ) -> StreakUpdate {
        let Some(last_day) = last_day else {
            return StreakUpdate::Unchanged;
        };
        match (today - last_day).num_days() {
            d if d <= 0 => StreakUpdate::Unchanged,
            1 if focus_minutes_on_last_day >= u64::from(daily_goal_minutes) => StreakUpdate::Extend,
            _ => StreakUpdate::Reset,
        }
    }

    /// Apply a decision through the tracker's additive primitive.
    pub fn apply(update: StreakUpdate, tracker: &mut ProductivityTracker) -> RolloverOutcome {
        let streak_before = tracker.streak_days();
        let streak_after = match update {
            StreakUpdate::Unchanged => streak_before,
            StreakUpdate::Extend => tracker.advance_streak(1),
            StreakUpdate::Reset => tracker.advance_streak(-i64::from(streak_before)),
        };
        if update != StreakUpdate::Unchanged {
            tracing::info!(?update, streak_before, streak_after, "streak rolled over");
        }
        RolloverOutcome {
            update,
            streak_before,
            streak_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn first_use_is_unchanged() {
        assert_eq!(
            StreakRollover::decide(None, day(5), 0, 480),
            StreakUpdate::Unchanged
        );
    }

    #[test]
    fn same_day_is_unchanged() {
        assert_eq!(
            StreakRollover::decide(Some(day(5)), day(5), 900, 480),
            StreakUpdate::Unchanged
        );
    }

    #[test]
    fn goal_met_yesterday_extends() {
        assert_eq!(
            StreakRollover::decide(Some(day(4)), day(5), 480, 480),
            StreakUpdate::Extend
        );
    }

    #[test]
    fn goal_missed_or_gap_resets() {
        assert_eq!(
            StreakRollover::decide(Some(day(4)), day(5), 479, 480),
            StreakUpdate::Reset
        );
        assert_eq!(
            StreakRollover::decide(Some(day(2)), day(5), 1000, 480),
            StreakUpdate::Reset
        );
    }

    #[test]
    fn apply_moves_tracker_streak() {
        let mut tracker = ProductivityTracker::new();
        tracker.advance_streak(4);

        let outcome = StreakRollover::apply(StreakUpdate::Extend, &mut tracker);
        assert_eq!((outcome.streak_before, outcome.streak_after), (4, 5));

        let outcome = StreakRollover::apply(StreakUpdate::Reset, &mut tracker);
        assert_eq!(outcome.streak_after, 0);
        assert_eq!(tracker.streak_days(), 0);

        let outcome = StreakRollover::apply(StreakUpdate::Unchanged, &mut tracker);
        assert_eq!(outcome.streak_after, 0);
    }
}
