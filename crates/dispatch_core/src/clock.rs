//! Wall-clock abstraction.
//!
//! Time-of-day surge bands, entity timestamps and derived workflow seeds all
//! read the clock through this trait so tests can pin the hour instead of
//! depending on when they run.

use chrono::{DateTime, Duration, Timelike, Utc};
use parking_lot::Mutex;

pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for tests: frozen until explicitly moved.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now = *now + delta;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

/// UTC hour of day in `0..=23`, the input to surge band matching.
pub fn utc_hour(at: DateTime<Utc>) -> u8 {
    at.hour() as u8
}

/// Unix-timestamp seed, used when the workflow caller does not supply one.
pub fn seed_from(at: DateTime<Utc>) -> u64 {
    at.timestamp().max(0) as u64
}
