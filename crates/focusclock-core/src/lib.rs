//! # focusclock Core Library
//!
//! This library provides the focus-session timer and productivity scoring
//! behind focusclock. The CLI binary is a thin driver over the same core.
//!
//! ## Architecture
//!
//! - **Session Clock**: A tick-driven countdown state machine that also
//!   decides the work/short-break/long-break rotation. The caller owns the
//!   periodic timer and invokes `tick()` once per second.
//! - **Productivity Tracker**: Counters for completed work sessions, focus
//!   minutes, streak and daily goal, with a derived 0-100 score.
//! - **Storage**: SQLite-based session history and TOML-based configuration,
//!   used by callers as the persistence collaborator.
//!
//! The clock and tracker never call each other; the driver routes clock
//! [`Event`]s into the tracker.
//!
//! ## Key Components
//!
//! - [`SessionClock`]: Countdown and rotation state machine
//! - [`ProductivityTracker`]: Session history and score
//! - [`StreakRollover`]: Day-rollover streak policy
//! - [`Database`]: Session and statistics persistence
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod productivity;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, InvalidInput, InvalidTransition};
pub use events::Event;
pub use productivity::{
    ProductivityStats, ProductivityTracker, RolloverOutcome, ScoreBreakdown, StreakRollover,
    StreakUpdate,
};
pub use storage::{Config, Database, DaySummary, SessionRecord};
pub use timer::{
    ClockCommand, ClockSnapshot, ClockStatus, SessionClock, SessionDurations, SessionType,
};
