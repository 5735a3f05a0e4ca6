mod clock;
mod session;

pub use clock::{ClockCommand, ClockSnapshot, ClockStatus, SessionClock};
pub use session::{SessionDurations, SessionType};
