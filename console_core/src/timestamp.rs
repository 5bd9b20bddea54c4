//! Output timestamps with an injected clock

use chrono::{Local, NaiveTime, Timelike};

/// Source of the current wall-clock time of day
pub trait Clock {
    fn now(&self) -> NaiveTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Clock frozen at a given time (for tests and replays)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveTime);

impl FixedClock {
    /// Returns `None` for an out-of-range time
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveTime {
        self.0
    }
}

/// Formats the `[H:M:S] ` prefix; fields are not zero-padded
pub fn format_timestamp(clock: &dyn Clock) -> String {
    let now = clock.now();
    format!("[{}:{}:{}] ", now.hour(), now.minute(), now.second())
}
