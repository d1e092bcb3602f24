// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction for testable schedule evaluation
//!
//! Schedules are expressed in local wall-clock time, so the clock hands out
//! naive local timestamps rather than monotonic instants.

use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, Timelike};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A clock that provides the current local wall-clock time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<NaiveDateTime>>,
}

impl FakeClock {
    /// Create a fake clock frozen at the given local time
    pub fn at(start: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let step = ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::zero());
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += step;
    }

    /// Set the clock to a specific local time
    pub fn set(&self, time: NaiveDateTime) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = time;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Round to the nearest whole second
///
/// A wake-up a fraction early reads as the minute it was meant for.
pub fn nearest_second(now: NaiveDateTime) -> NaiveDateTime {
    let rounded = now + ChronoDuration::milliseconds(500);
    rounded.with_nanosecond(0).unwrap_or(rounded)
}

/// Time remaining until the next minute boundary
pub fn until_next_minute(now: NaiveDateTime) -> Duration {
    let into_minute = Duration::from_secs(u64::from(now.second()))
        + Duration::from_nanos(u64::from(now.nanosecond() % 1_000_000_000));
    Duration::from_secs(60).saturating_sub(into_minute)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
