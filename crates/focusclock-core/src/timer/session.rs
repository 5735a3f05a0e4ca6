use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub const ALL: [SessionType; 3] = [
        SessionType::Work,
        SessionType::ShortBreak,
        SessionType::LongBreak,
    ];

    pub fn is_break(self) -> bool {
        !matches!(self, SessionType::Work)
    }

    /// Stable identifier, also used as the storage column value.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "short_break",
            SessionType::LongBreak => "long_break",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionType::Work => "Focus",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "work" | "focus" => Ok(SessionType::Work),
            "short_break" => Ok(SessionType::ShortBreak),
            "long_break" => Ok(SessionType::LongBreak),
            other => Err(format!("unknown session type: {other}")),
        }
    }
}

/// Nominal length of each session type, in whole minutes.
///
/// All three values are guaranteed positive; the only way to build one is
/// through [`SessionDurations::new`] or `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDurations {
    work: u32,
    short_break: u32,
    long_break: u32,
}

impl SessionDurations {
    pub const DEFAULT_WORK_MIN: u32 = 25;
    pub const DEFAULT_SHORT_BREAK_MIN: u32 = 5;
    pub const DEFAULT_LONG_BREAK_MIN: u32 = 15;

    /// # Errors
    /// Returns [`InvalidInput`] if any duration is zero.
    pub fn new(work: u32, short_break: u32, long_break: u32) -> Result<Self, InvalidInput> {
        for (field, value) in [
            ("durations.work", work),
            ("durations.short_break", short_break),
            ("durations.long_break", long_break),
        ] {
            if value == 0 {
                return Err(InvalidInput::not_positive(field, 0));
            }
        }
        Ok(Self {
            work,
            short_break,
            long_break,
        })
    }

    pub fn minutes(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Work => self.work,
            SessionType::ShortBreak => self.short_break,
            SessionType::LongBreak => self.long_break,
        }
    }

    pub fn seconds(&self, session_type: SessionType) -> u64 {
        u64::from(self.minutes(session_type)) * 60
    }
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self {
            work: Self::DEFAULT_WORK_MIN,
            short_break: Self::DEFAULT_SHORT_BREAK_MIN,
            long_break: Self::DEFAULT_LONG_BREAK_MIN,
        }
    }
}
