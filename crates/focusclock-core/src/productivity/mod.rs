//! Productivity tracking for focus sessions.
//!
//! The tracker accumulates completed work sessions, focus minutes and the
//! streak, and derives a bounded 0-100 score from them. The streak rollover
//! policy sits beside it as a separate collaborator.

mod score;
mod streak;
mod tracker;

pub use score::{
    ScoreBreakdown, GOAL_PROGRESS_CAP, SCORE_CAP, SESSION_BONUS_CAP, SESSION_BONUS_PER_SESSION,
    STREAK_BONUS_CAP, STREAK_BONUS_PER_DAY,
};
pub use streak::{RolloverOutcome, StreakRollover, StreakUpdate};
pub use tracker::{ProductivityStats, ProductivityTracker, DEFAULT_DAILY_GOAL_MINUTES};
