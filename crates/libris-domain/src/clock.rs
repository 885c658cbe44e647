//! Clock trait - where "now" comes from
//!
//! Due dates and overdue checks read the time through this boundary so that
//! lending rules can be exercised without waiting for real days to pass.

use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// Source of the current time
pub trait Clock {
    /// Current instant in UTC
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the [`Library`](crate::Library).
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use libris_domain::{Clock, ManualClock};
///
/// let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
/// let handle = clock.clone();
/// handle.advance(Duration::days(3));
/// assert_eq!(clock.now(), Utc.with_ymd_and_hms(2026, 1, 4, 0, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Jump to `instant`
    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }

    /// Move forward (or backward, for a negative duration)
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
