//! Periodic snapshot save. One timer handle for the whole session, so
//! overlapping fires cannot happen.

use std::time::{Duration, Instant};

pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct AutoSaveTimer {
    interval: Duration,
    last_fire: Instant,
}

impl AutoSaveTimer {
    pub fn new(now: Instant) -> Self {
        Self::with_interval(AUTO_SAVE_INTERVAL, now)
    }

    pub fn with_interval(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_fire: now,
        }
    }

    /// True when the interval has elapsed and there is something dirty to
    /// save. The timer rewinds whenever the interval elapses, dirty or not,
    /// so a burst of edits right after a clean period still waits a full
    /// interval.
    pub fn should_fire(&mut self, now: Instant, dirty: bool) -> bool {
        if now.duration_since(self.last_fire) < self.interval {
            return false;
        }
        self.last_fire = now;
        dirty
    }
}
