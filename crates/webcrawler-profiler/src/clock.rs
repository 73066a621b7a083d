//! Time sources used for profiling.

use std::time::{Duration, Instant};

use chrono::{DateTime, FixedOffset, Local, TimeDelta};
use parking_lot::Mutex;

/// Source of the current time.
///
/// The profiler never reads the system clock directly; every timestamp it
/// takes comes through this trait so tests can drive time explicitly.
pub trait Clock: Send + Sync {
    /// Current time, including the local offset it was observed in.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall-clock time anchored at construction and advanced monotonically.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    anchor: DateTime<FixedOffset>,
    origin: Instant,
}

impl SystemClock {
    /// Create a clock anchored at the current local time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor: Local::now().fixed_offset(),
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let elapsed = TimeDelta::from_std(self.origin.elapsed())
            .unwrap_or(TimeDelta::MAX);
        self.anchor.checked_add_signed(elapsed).unwrap_or(self.anchor)
    }
}

/// Manually driven clock for deterministic tests.
///
/// Time only moves when [`FakeClock::advance`] or [`FakeClock::set`] is called.
#[derive(Debug)]
pub struct FakeClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FakeClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub const fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let delta = TimeDelta::from_std(delta).unwrap_or(TimeDelta::MAX);
        let mut now = self.now.lock();
        *now = now.checked_add_signed(delta).unwrap_or(*now);
    }

    /// Jump the clock to `instant`, forwards or backwards.
    pub fn set(&self, instant: DateTime<FixedOffset>) {
        *self.now.lock() = instant;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock()
    }
}
