// crates/renown-core/src/epoch.rs
//
// Epoch-day clock for the Renown engine.
//
// An epoch day is `floor(unix_seconds / 86400)`. Every once-per-day gate
// (check-ins, leaderboard sweeps) compares epoch days computed through a
// single `Clock`, so the write path and the read path can never disagree
// about which day it is.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};

/// Number of seconds in one epoch day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Integer day index used to gate once-per-day operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpochDay(pub i64);

impl EpochDay {
    /// Epoch day containing the given unix timestamp (seconds).
    ///
    /// Uses Euclidean division so timestamps before 1970 floor towards
    /// negative infinity instead of towards zero.
    pub fn from_unix(unix_seconds: i64) -> Self {
        Self(unix_seconds.div_euclid(SECONDS_PER_DAY))
    }

    /// The following day.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Whether `self` is exactly the day after `earlier`.
    pub fn follows(self, earlier: EpochDay) -> bool {
        self == earlier.next()
    }

    /// Unix timestamp (seconds) at which this day starts.
    pub fn start_unix(self) -> i64 {
        self.0 * SECONDS_PER_DAY
    }
}

impl fmt::Display for EpochDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}

/// The single authoritative time source.
pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn now_unix(&self) -> i64;

    /// Current epoch day.
    fn today(&self) -> EpochDay {
        EpochDay::from_unix(self.now_unix())
    }
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Settable clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at the given unix time.
    pub fn new(unix_seconds: i64) -> Self {
        Self {
            now: AtomicI64::new(unix_seconds),
        }
    }

    /// Create a clock frozen at noon of the given epoch day.
    pub fn at_day(day: i64) -> Self {
        Self::new(noon_of(day))
    }

    /// Jump to an absolute unix time.
    pub fn set(&self, unix_seconds: i64) {
        self.now.store(unix_seconds, Ordering::SeqCst);
    }

    /// Jump to noon of the given epoch day.
    pub fn set_day(&self, day: i64) {
        self.set(noon_of(day));
    }

    /// Move forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }

    /// Move forward by whole days.
    pub fn advance_days(&self, days: i64) {
        self.advance(days * SECONDS_PER_DAY);
    }
}

fn noon_of(day: i64) -> i64 {
    EpochDay(day).start_unix() + SECONDS_PER_DAY / 2
}

impl Clock for ManualClock {
    fn now_unix(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
