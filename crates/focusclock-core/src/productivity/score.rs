//! Productivity score.
//!
//! ```text
//! goal_progress = min(focus_minutes / daily_goal * 100, 100)
//! session_bonus = min(completed_sessions * 5, 25)
//! streak_bonus  = min(streak_days * 2, 20)
//! score         = min(round_half_up(goal_progress + session_bonus + streak_bonus), 100)
//! ```
//!
//! Each term is capped on its own before summing, then the sum is capped.

use serde::{Deserialize, Serialize};

use super::tracker::ProductivityStats;

pub const GOAL_PROGRESS_CAP: f64 = 100.0;
pub const SESSION_BONUS_PER_SESSION: u64 = 5;
pub const SESSION_BONUS_CAP: u64 = 25;
pub const STREAK_BONUS_PER_DAY: u64 = 2;
pub const STREAK_BONUS_CAP: u64 = 20;
pub const SCORE_CAP: u8 = 100;

/// The three capped terms behind a score, for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0.0 .. 100.0
    pub goal_progress: f64,
    /// 0 ..= 25
    pub session_bonus: u64,
    /// 0 ..= 20
    pub streak_bonus: u64,
    /// 0 ..= 100
    pub total: u8,
}

impl ScoreBreakdown {
    pub fn compute(stats: &ProductivityStats) -> Self {
        let goal_progress =
            goal_progress(stats.focus_minutes_accumulated, stats.daily_goal_minutes);
        let session_bonus = stats
            .completed_session_count
            .saturating_mul(SESSION_BONUS_PER_SESSION)
            .min(SESSION_BONUS_CAP);
        let streak_bonus = u64::from(stats.streak_days)
            .saturating_mul(STREAK_BONUS_PER_DAY)
            .min(STREAK_BONUS_CAP);

        let raw = goal_progress + session_bonus as f64 + streak_bonus as f64;
        let total = round_half_up(raw).min(u64::from(SCORE_CAP)) as u8;

        Self {
            goal_progress,
            session_bonus,
            streak_bonus,
            total,
        }
    }
}

/// Multiplies before dividing so exact halves stay exact.
fn goal_progress(focus_minutes: u64, daily_goal_minutes: u32) -> f64 {
    if daily_goal_minutes == 0 {
        return 0.0;
    }
    (focus_minutes as f64 * 100.0 / f64::from(daily_goal_minutes)).min(GOAL_PROGRESS_CAP)
}

fn round_half_up(value: f64) -> u64 {
    (value + 0.5).floor() as u64
}
