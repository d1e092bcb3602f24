// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish/subscribe bus adapters

mod backoff;
mod mqtt;

pub use backoff::ReconnectBackoff;
pub use mqtt::{Inbox, MqttBus};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeBus, PublishCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from bus operations
#[derive(Debug, Error)]
pub enum BusError {
    #[error("not connected to broker")]
    NotConnected,
    #[error("publish to {topic} failed: {message}")]
    PublishFailed { topic: String, message: String },
}

/// Event reported by a bus connection task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusEvent {
    /// The broker accepted a connection, first or after a reconnect
    Connected,
    /// Payload received on the controller topic
    Message(Vec<u8>),
}

/// Outbound side of the message bus
///
/// Publishing is fire-and-forget: success means the message was handed to
/// the client, not that any remote received it.
#[async_trait]
pub trait BusAdapter: Clone + Send + Sync + 'static {
    /// Publish a text payload on a topic
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError>;

    /// Whether the broker connection is currently up
    fn is_connected(&self) -> bool;
}

/// Receiver of inbound bus messages
///
/// Implementations must not fail on bad input: malformed payloads are
/// logged and dropped.
#[async_trait]
pub trait InboundHandler: Send {
    async fn handle(&mut self, payload: &[u8]);
}
