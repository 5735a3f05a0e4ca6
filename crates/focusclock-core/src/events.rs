use serde::{Deserialize, Serialize};

use crate::timer::SessionType;

/// Every accepted `tick()` produces an Event.
/// The driver routes them to renderers, feedback and the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Progress {
        remaining_seconds: u64,
        /// 0.0 .. 1.0 of the planned session.
        fraction_elapsed: f64,
    },
    SessionCompleted {
        session_type: SessionType,
        planned_duration_minutes: u32,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::SessionCompleted { .. })
    }

    /// The finished session and its planned length, for completion events.
    pub fn completed_session(&self) -> Option<(SessionType, u32)> {
        match *self {
            Event::SessionCompleted {
                session_type,
                planned_duration_minutes,
            } => Some((session_type, planned_duration_minutes)),
            Event::Progress { .. } => None,
        }
    }
}
