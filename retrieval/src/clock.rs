//! Clock abstraction so cache freshness is testable.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A manually advanced clock, for tests that drive TTL expiry.
///
/// Starts at the Unix epoch.
#[derive(Default)]
pub struct ManualClock {
    now_millis: AtomicI64,
}

impl ManualClock {
    /// Create a clock positioned at the Unix epoch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, delta: chrono::Duration) {
        self.now_millis
            .fetch_add(delta.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.now_millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}
