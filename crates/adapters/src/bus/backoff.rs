// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Broker reconnect pacing

use std::time::Duration;

/// Escalating delay between broker connection attempts
///
/// Waits `initial` after each of the first `threshold` consecutive failures
/// and `extended` after every failure beyond that.
#[derive(Debug, Clone)]
pub struct ReconnectBackoff {
    initial: Duration,
    extended: Duration,
    threshold: u32,
    failures: u32,
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_secs(60), 12)
    }
}

impl ReconnectBackoff {
    pub fn new(initial: Duration, extended: Duration, threshold: u32) -> Self {
        Self {
            initial,
            extended,
            threshold,
            failures: 0,
        }
    }

    /// Record a failure and return how long to wait before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        self.failures = self.failures.saturating_add(1);
        if self.failures > self.threshold {
            self.extended
        } else {
            self.initial
        }
    }

    /// Clear the failure count after a successful connection
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
