use serde::{Deserialize, Serialize};

use super::score::ScoreBreakdown;
use crate::error::InvalidInput;
use crate::events::Event;
use crate::timer::SessionType;

pub const DEFAULT_DAILY_GOAL_MINUTES: u32 = 480;

fn default_daily_goal() -> u32 {
    DEFAULT_DAILY_GOAL_MINUTES
}

/// Raw counters behind the productivity score.
///
/// This is the shape the persistence collaborator reads and writes. It holds
/// no score: the score is always derived from these four fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivityStats {
    pub focus_minutes_accumulated: u64,
    pub completed_session_count: u64,
    pub streak_days: u32,
    #[serde(default = "default_daily_goal")]
    pub daily_goal_minutes: u32,
}

impl ProductivityStats {
    pub fn score(&self) -> u8 {
        ScoreBreakdown::compute(self).total
    }
}

impl Default for ProductivityStats {
    fn default() -> Self {
        Self {
            focus_minutes_accumulated: 0,
            completed_session_count: 0,
            streak_days: 0,
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
        }
    }
}

/// Accumulates session history and keeps the derived score current.
///
/// Serializes as its [`ProductivityStats`]; deserializing validates the goal
/// and recomputes the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProductivityStats", into = "ProductivityStats")]
pub struct ProductivityTracker {
    stats: ProductivityStats,
    score: u8,
}

impl ProductivityTracker {
    pub fn new() -> Self {
        Self::from_valid(ProductivityStats::default())
    }

    /// # Errors
    /// Returns [`InvalidInput`] if `daily_goal_minutes` is not positive.
    pub fn with_daily_goal(minutes: i64) -> Result<Self, InvalidInput> {
        let mut tracker = Self::new();
        tracker.set_daily_goal(minutes)?;
        Ok(tracker)
    }

    /// Rehydrate from persisted counters.
    ///
    /// # Errors
    /// Returns [`InvalidInput`] if `daily_goal_minutes` is zero.
    pub fn from_stats(stats: ProductivityStats) -> Result<Self, InvalidInput> {
        if stats.daily_goal_minutes == 0 {
            return Err(InvalidInput::not_positive("daily_goal_minutes", 0));
        }
        Ok(Self::from_valid(stats))
    }

    fn from_valid(stats: ProductivityStats) -> Self {
        Self {
            score: stats.score(),
            stats,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn stats(&self) -> &ProductivityStats {
        &self.stats
    }

    /// Current score in `0..=100`.
    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown::compute(&self.stats)
    }

    pub fn focus_minutes_accumulated(&self) -> u64 {
        self.stats.focus_minutes_accumulated
    }

    pub fn completed_session_count(&self) -> u64 {
        self.stats.completed_session_count
    }

    pub fn streak_days(&self) -> u32 {
        self.stats.streak_days
    }

    pub fn daily_goal_minutes(&self) -> u32 {
        self.stats.daily_goal_minutes
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Count a finished session.
    ///
    /// Only work sessions move the counters; breaks are accepted and
    /// ignored. A non-positive duration is rejected and changes nothing.
    pub fn record_completion(
        &mut self,
        session_type: SessionType,
        planned_duration_minutes: i64,
    ) -> Result<(), InvalidInput> {
        if planned_duration_minutes <= 0 {
            tracing::warn!(
                planned_duration_minutes,
                "rejected completion with non-positive duration"
            );
            return Err(InvalidInput::not_positive(
                "planned_duration_minutes",
                planned_duration_minutes,
            ));
        }
        if session_type.is_break() {
            return Ok(());
        }

        self.stats.completed_session_count = self.stats.completed_session_count.saturating_add(1);
        self.stats.focus_minutes_accumulated = self
            .stats
            .focus_minutes_accumulated
            .saturating_add(planned_duration_minutes.unsigned_abs());
        self.recompute();
        tracing::debug!(
            completed_session_count = self.stats.completed_session_count,
            focus_minutes_accumulated = self.stats.focus_minutes_accumulated,
            score = self.score,
            "recorded work session"
        );
        Ok(())
    }

    /// Forward a clock event; progress events are ignored.
    pub fn record_event(&mut self, event: &Event) -> Result<(), InvalidInput> {
        match event.completed_session() {
            Some((session_type, minutes)) => {
                self.record_completion(session_type, i64::from(minutes))
            }
            None => Ok(()),
        }
    }

    /// Add `days` (possibly negative) to the streak, never going below zero.
    ///
    /// Returns the new streak length.
    pub fn advance_streak(&mut self, days: i64) -> u32 {
        let next = i64::from(self.stats.streak_days)
            .saturating_add(days)
            .clamp(0, i64::from(u32::MAX));
        self.stats.streak_days = next as u32;
        self.recompute();
        self.stats.streak_days
    }

    pub fn set_daily_goal(&mut self, minutes: i64) -> Result<(), InvalidInput> {
        if minutes <= 0 {
            return Err(InvalidInput::not_positive("daily_goal_minutes", minutes));
        }
        let minutes = u32::try_from(minutes).map_err(|_| InvalidInput {
            field: "daily_goal_minutes",
            value: minutes,
            reason: "exceeds the supported range",
        })?;
        self.stats.daily_goal_minutes = minutes;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        self.score = self.stats.score();
    }
}

impl Default for ProductivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<ProductivityStats> for ProductivityTracker {
    type Error = InvalidInput;

    fn try_from(stats: ProductivityStats) -> Result<Self, Self::Error> {
        Self::from_stats(stats)
    }
}

impl From<ProductivityTracker> for ProductivityStats {
    fn from(tracker: ProductivityTracker) -> Self {
        tracker.stats
    }
}
