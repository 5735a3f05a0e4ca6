//! Session clock implementation.
//!
//! The clock is a tick-driven state machine. It owns no timer of its own:
//! the caller invokes `tick()` once per second while the clock is running,
//! which keeps the logic testable by looping over `tick()` synchronously.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> Completed -> Idle
//!          (start)   (pause)   (start)   (tick to 0)  (advance/reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut clock = SessionClock::new(SessionDurations::default());
//! clock.start()?;
//! // Once per second:
//! if let Event::SessionCompleted { .. } = clock.tick()? {
//!     clock.advance_after_completion()?;
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::session::{SessionDurations, SessionType};
use crate::error::{InvalidInput, InvalidTransition};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

impl fmt::Display for ClockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClockStatus::Idle => "idle",
            ClockStatus::Running => "running",
            ClockStatus::Paused => "paused",
            ClockStatus::Completed => "completed",
        })
    }
}

/// The clock operations that can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockCommand {
    Start,
    Pause,
    Tick,
    SwitchSessionType,
    AdvanceAfterCompletion,
}

impl fmt::Display for ClockCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClockCommand::Start => "start",
            ClockCommand::Pause => "pause",
            ClockCommand::Tick => "tick",
            ClockCommand::SwitchSessionType => "switch session type",
            ClockCommand::AdvanceAfterCompletion => "advance after completion",
        })
    }
}

const NOT_RUNNING: [ClockStatus; 3] = [
    ClockStatus::Idle,
    ClockStatus::Paused,
    ClockStatus::Completed,
];

/// Serializable view of the clock for renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub session_type: SessionType,
    pub status: ClockStatus,
    pub remaining_seconds: u64,
    pub planned_seconds: u64,
    pub fraction_elapsed: f64,
    pub completed_work_cycles: u32,
}

/// Countdown for one session at a time, plus the work/break rotation.
///
/// Every command validates the current status before touching any field,
/// so a rejected call leaves the clock exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    durations: SessionDurations,
    /// Every n-th work session is followed by a long break.
    long_break_interval: u32,
    session_type: SessionType,
    remaining_seconds: u64,
    status: ClockStatus,
    completed_work_cycles: u32,
}

impl SessionClock {
    pub const DEFAULT_LONG_BREAK_INTERVAL: u32 = 3;

    /// Create an idle clock on a work session.
    pub fn new(durations: SessionDurations) -> Self {
        Self {
            durations,
            long_break_interval: Self::DEFAULT_LONG_BREAK_INTERVAL,
            session_type: SessionType::Work,
            remaining_seconds: durations.seconds(SessionType::Work),
            status: ClockStatus::Idle,
            completed_work_cycles: 0,
        }
    }

    /// # Errors
    /// Returns [`InvalidInput`] if `long_break_interval` is zero.
    pub fn with_long_break_interval(
        durations: SessionDurations,
        long_break_interval: u32,
    ) -> Result<Self, InvalidInput> {
        if long_break_interval == 0 {
            return Err(InvalidInput::not_positive("rotation.long_break_interval", 0));
        }
        Ok(Self {
            long_break_interval,
            ..Self::new(durations)
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> ClockStatus {
        self.status
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn completed_work_cycles(&self) -> u32 {
        self.completed_work_cycles
    }

    pub fn durations(&self) -> &SessionDurations {
        &self.durations
    }

    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval
    }

    pub fn planned_seconds(&self) -> u64 {
        self.durations.seconds(self.session_type)
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn fraction_elapsed(&self) -> f64 {
        let planned = self.planned_seconds();
        if planned == 0 {
            return 0.0;
        }
        planned.saturating_sub(self.remaining_seconds) as f64 / planned as f64
    }

    /// The session that `advance_after_completion` would switch to.
    pub fn upcoming_session_type(&self) -> SessionType {
        next_session_type(
            self.session_type,
            self.completed_work_cycles,
            self.long_break_interval,
        )
    }

    /// Remaining time as `MM:SS`.
    pub fn format_remaining(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            session_type: self.session_type,
            status: self.status,
            remaining_seconds: self.remaining_seconds,
            planned_seconds: self.planned_seconds(),
            fraction_elapsed: self.fraction_elapsed(),
            completed_work_cycles: self.completed_work_cycles,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<(), InvalidTransition> {
        self.ensure(ClockCommand::Start, &NOT_RUNNING)?;
        if self.status == ClockStatus::Completed {
            // The previous run hit zero; run the same session again.
            self.remaining_seconds = self.planned_seconds();
        }
        self.status = ClockStatus::Running;
        tracing::debug!(
            session_type = %self.session_type,
            remaining_seconds = self.remaining_seconds,
            "clock started"
        );
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), InvalidTransition> {
        self.ensure(ClockCommand::Pause, &[ClockStatus::Running])?;
        self.status = ClockStatus::Paused;
        tracing::debug!(remaining_seconds = self.remaining_seconds, "clock paused");
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// Returns `Event::SessionCompleted` on the tick that reaches zero and
    /// `Event::Progress` on every other tick.
    pub fn tick(&mut self) -> Result<Event, InvalidTransition> {
        self.ensure(ClockCommand::Tick, &[ClockStatus::Running])?;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        if self.remaining_seconds == 0 {
            self.status = ClockStatus::Completed;
            let planned_duration_minutes = self.durations.minutes(self.session_type);
            tracing::info!(
                session_type = %self.session_type,
                planned_duration_minutes,
                "session completed"
            );
            return Ok(Event::SessionCompleted {
                session_type: self.session_type,
                planned_duration_minutes,
            });
        }

        Ok(Event::Progress {
            remaining_seconds: self.remaining_seconds,
            fraction_elapsed: self.fraction_elapsed(),
        })
    }

    /// Rewind the current session to its full duration and go idle.
    ///
    /// Accepted from every status. Keeps the session type and cycle count.
    pub fn reset(&mut self) {
        self.remaining_seconds = self.planned_seconds();
        self.status = ClockStatus::Idle;
        tracing::debug!(session_type = %self.session_type, "clock reset");
    }

    /// Rejected while running: the session type is fixed once started.
    pub fn switch_session_type(
        &mut self,
        session_type: SessionType,
    ) -> Result<(), InvalidTransition> {
        self.ensure(ClockCommand::SwitchSessionType, &NOT_RUNNING)?;
        self.session_type = session_type;
        self.reset();
        Ok(())
    }

    /// Rotate to the next session after a `SessionCompleted` event.
    ///
    /// Only accepted while `Completed`. After work: a long break when the
    /// pre-increment cycle count is the last of an interval
    /// (`cycles % interval == interval - 1`), otherwise a short break. After
    /// any break: work. The cycle count only grows when the finished session
    /// was work.
    pub fn advance_after_completion(&mut self) -> Result<SessionType, InvalidTransition> {
        self.ensure(ClockCommand::AdvanceAfterCompletion, &[ClockStatus::Completed])?;
        let finished = self.session_type;
        let next = self.upcoming_session_type();

        self.switch_session_type(next)?;
        if finished == SessionType::Work {
            self.completed_work_cycles = self.completed_work_cycles.saturating_add(1);
        }
        tracing::debug!(
            %finished,
            %next,
            completed_work_cycles = self.completed_work_cycles,
            "advanced to next session"
        );
        Ok(next)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn ensure(
        &self,
        attempted: ClockCommand,
        allowed: &[ClockStatus],
    ) -> Result<(), InvalidTransition> {
        if allowed.contains(&self.status) {
            return Ok(());
        }
        tracing::debug!(%attempted, from = %self.status, "rejected clock command");
        Err(InvalidTransition {
            attempted,
            from: self.status,
        })
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(SessionDurations::default())
    }
}

fn next_session_type(
    finished: SessionType,
    completed_work_cycles: u32,
    long_break_interval: u32,
) -> SessionType {
    match finished {
        SessionType::Work
            if completed_work_cycles % long_break_interval == long_break_interval - 1 =>
        {
            SessionType::LongBreak
        }
        SessionType::Work => SessionType::ShortBreak,
        SessionType::ShortBreak | SessionType::LongBreak => SessionType::Work,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_clock() -> SessionClock {
        SessionClock::new(SessionDurations::new(1, 1, 2).unwrap())
    }

    fn run_to_completion(clock: &mut SessionClock) -> Event {
        clock.start().unwrap();
        loop {
            let event = clock.tick().unwrap();
            if event.is_completion() {
                return event;
            }
        }
    }

    #[test]
    fn new_clock_is_idle_work() {
        let clock = SessionClock::default();
        assert_eq!(clock.status(), ClockStatus::Idle);
        assert_eq!(clock.session_type(), SessionType::Work);
        assert_eq!(clock.remaining_seconds(), 25 * 60);
        assert_eq!(clock.completed_work_cycles(), 0);
        assert_eq!(clock.format_remaining(), "25:00");
    }

    #[test]
    fn start_pause_start() {
        let mut clock = SessionClock::default();
        clock.start().unwrap();
        assert_eq!(clock.status(), ClockStatus::Running);

        clock.pause().unwrap();
        assert_eq!(clock.status(), ClockStatus::Paused);

        clock.start().unwrap();
        assert_eq!(clock.status(), ClockStatus::Running);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut clock = SessionClock::default();
        clock.start().unwrap();
        let err = clock.start().unwrap_err();
        assert_eq!(err.attempted, ClockCommand::Start);
        assert_eq!(err.from, ClockStatus::Running);
    }

    #[test]
    fn pause_requires_running() {
        let mut clock = SessionClock::default();
        let err = clock.pause().unwrap_err();
        assert_eq!(
            err,
            InvalidTransition {
                attempted: ClockCommand::Pause,
                from: ClockStatus::Idle
            }
        );
    }

    #[test]
    fn tick_reports_progress() {
        let mut clock = short_clock();
        clock.start().unwrap();
        match clock.tick().unwrap() {
            Event::Progress {
                remaining_seconds,
                fraction_elapsed,
            } => {
                assert_eq!(remaining_seconds, 59);
                assert!((fraction_elapsed - 1.0 / 60.0).abs() < 1e-12);
            }
            other => panic!("Expected Progress, got {other:?}"),
        }
    }

    #[test]
    fn completion_on_exactly_the_nth_tick() {
        let mut clock = short_clock();
        clock.start().unwrap();
        for _ in 0..59 {
            assert!(!clock.tick().unwrap().is_completion());
        }
        assert_eq!(
            clock.tick().unwrap(),
            Event::SessionCompleted {
                session_type: SessionType::Work,
                planned_duration_minutes: 1,
            }
        );
        assert_eq!(clock.status(), ClockStatus::Completed);
        assert_eq!(clock.remaining_seconds(), 0);
    }

    #[test]
    fn tick_when_not_running_leaves_clock_untouched() {
        let mut clock = short_clock();
        clock.start().unwrap();
        clock.tick().unwrap();
        clock.pause().unwrap();
        let before = clock.clone();

        let err = clock.tick().unwrap_err();
        assert_eq!(err.attempted, ClockCommand::Tick);
        assert_eq!(err.from, ClockStatus::Paused);
        assert_eq!(clock, before);
    }

    #[test]
    fn switch_while_running_is_rejected() {
        let mut clock = SessionClock::default();
        clock.start().unwrap();
        let before = clock.clone();
        assert!(clock.switch_session_type(SessionType::LongBreak).is_err());
        assert_eq!(clock, before);
    }

    #[test]
    fn switch_resets_to_new_duration() {
        let mut clock = SessionClock::default();
        clock.start().unwrap();
        clock.tick().unwrap();
        clock.pause().unwrap();
        clock.switch_session_type(SessionType::ShortBreak).unwrap();
        assert_eq!(clock.session_type(), SessionType::ShortBreak);
        assert_eq!(clock.remaining_seconds(), 5 * 60);
        assert_eq!(clock.status(), ClockStatus::Idle);
    }

    #[test]
    fn reset_keeps_type_and_cycles() {
        let mut clock = short_clock();
        run_to_completion(&mut clock);
        clock.advance_after_completion().unwrap();
        clock.start().unwrap();
        clock.tick().unwrap();

        clock.reset();
        assert_eq!(clock.status(), ClockStatus::Idle);
        assert_eq!(clock.session_type(), SessionType::ShortBreak);
        assert_eq!(clock.remaining_seconds(), 60);
        assert_eq!(clock.completed_work_cycles(), 1);
    }

    #[test]
    fn reset_twice_equals_reset_once() {
        let mut once = short_clock();
        once.start().unwrap();
        once.tick().unwrap();
        let mut twice = once.clone();

        once.reset();
        twice.reset();
        twice.reset();
        assert_eq!(once, twice);
    }

    #[test]
    fn rotation_short_short_long() {
        let mut clock = short_clock();
        let mut breaks = Vec::new();
        for _ in 0..3 {
            run_to_completion(&mut clock);
            breaks.push(clock.advance_after_completion().unwrap());
            run_to_completion(&mut clock);
            assert_eq!(clock.advance_after_completion().unwrap(), SessionType::Work);
        }
        assert_eq!(
            breaks,
            vec![
                SessionType::ShortBreak,
                SessionType::ShortBreak,
                SessionType::LongBreak
            ]
        );
        assert_eq!(clock.completed_work_cycles(), 3);
    }

    #[test]
    fn break_completion_does_not_count_as_cycle() {
        let mut clock = short_clock();
        clock.switch_session_type(SessionType::ShortBreak).unwrap();
        run_to_completion(&mut clock);
        assert_eq!(clock.advance_after_completion().unwrap(), SessionType::Work);
        assert_eq!(clock.completed_work_cycles(), 0);
    }

    #[test]
    fn advance_before_completion_is_rejected() {
        let mut clock = short_clock();
        for _ in 0..3 {
            let err = clock.advance_after_completion().unwrap_err();
            assert_eq!(
                err,
                InvalidTransition {
                    attempted: ClockCommand::AdvanceAfterCompletion,
                    from: ClockStatus::Idle
                }
            );
        }
        assert_eq!(clock, short_clock());

        clock.start().unwrap();
        clock.tick().unwrap();
        clock.pause().unwrap();
        let before = clock.clone();
        let err = clock.advance_after_completion().unwrap_err();
        assert_eq!(err.from, ClockStatus::Paused);
        assert_eq!(clock, before);
        assert_eq!(clock.session_type(), SessionType::Work);
        assert_eq!(clock.completed_work_cycles(), 0);
    }

    #[test]
    fn advance_only_once_per_completion() {
        let mut clock = short_clock();
        run_to_completion(&mut clock);
        assert_eq!(clock.advance_after_completion().unwrap(), SessionType::ShortBreak);
        assert!(clock.advance_after_completion().is_err());
        assert_eq!(clock.session_type(), SessionType::ShortBreak);
        assert_eq!(clock.completed_work_cycles(), 1);
    }

    #[test]
    fn advance_while_running_is_rejected() {
        let mut clock = short_clock();
        clock.start().unwrap();
        let err = clock.advance_after_completion().unwrap_err();
        assert_eq!(err.attempted, ClockCommand::AdvanceAfterCompletion);
        assert_eq!(clock.completed_work_cycles(), 0);
    }

    #[test]
    fn custom_long_break_interval() {
        let durations = SessionDurations::new(1, 1, 1).unwrap();
        let mut clock = SessionClock::with_long_break_interval(durations, 2).unwrap();
        assert_eq!(clock.upcoming_session_type(), SessionType::ShortBreak);
        run_to_completion(&mut clock);
        clock.advance_after_completion().unwrap();
        clock.switch_session_type(SessionType::Work).unwrap();
        assert_eq!(clock.upcoming_session_type(), SessionType::LongBreak);

        assert!(SessionClock::with_long_break_interval(durations, 0).is_err());
    }

    #[test]
    fn start_after_completion_rearms_countdown() {
        let mut clock = short_clock();
        run_to_completion(&mut clock);
        clock.start().unwrap();
        assert_eq!(clock.remaining_seconds(), 60);
        assert!(!clock.tick().unwrap().is_completion());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut clock = short_clock();
        clock.start().unwrap();
        for _ in 0..30 {
            clock.tick().unwrap();
        }
        let snap = clock.snapshot();
        assert_eq!(snap.status, ClockStatus::Running);
        assert_eq!(snap.remaining_seconds, 30);
        assert_eq!(snap.planned_seconds, 60);
        assert!((snap.fraction_elapsed - 0.5).abs() < 1e-12);
        assert_eq!(clock.format_remaining(), "00:30");
    }
}
