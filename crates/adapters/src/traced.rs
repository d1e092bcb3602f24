// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::bus::{BusAdapter, BusError};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any BusAdapter
#[derive(Clone)]
pub struct TracedBus<B> {
    inner: B,
}

impl<B> TracedBus<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: BusAdapter> BusAdapter for TracedBus<B> {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
        let span = tracing::info_span!("bus.publish", topic);

        async {
            tracing::debug!(payload, "publishing");

            let start = std::time::Instant::now();
            let result = self.inner.publish(topic, payload).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(
                    payload,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "published"
                ),
                Err(e) => tracing::error!(
                    payload,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "publish failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn is_connected(&self) -> bool {
        let connected = self.inner.is_connected();
        tracing::trace!(connected, "checked connection");
        connected
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
