// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake bus adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BusAdapter, BusError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCall {
    pub topic: String,
    pub payload: String,
}

/// Fake bus adapter for testing
///
/// Starts connected. Publishes are recorded even when configured to fail,
/// so tests can see what was attempted.
#[derive(Clone)]
pub struct FakeBus {
    calls: Arc<Mutex<Vec<PublishCall>>>,
    connected: Arc<AtomicBool>,
    fail_publishes: Arc<AtomicBool>,
}

impl Default for FakeBus {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(AtomicBool::new(true)),
            fail_publishes: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Make every subsequent publish return an error
    pub fn fail_publishes(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Get all recorded publishes
    pub fn calls(&self) -> Vec<PublishCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Payloads of all recorded publishes, in order
    pub fn payloads(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.payload).collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

#[async_trait]
impl BusAdapter for FakeBus {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(PublishCall {
                topic: topic.to_string(),
                payload: payload.to_string(),
            });

        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(BusError::PublishFailed {
                topic: topic.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
