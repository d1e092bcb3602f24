// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! MQTT bus adapter

use super::{BusAdapter, BusError, BusEvent, ReconnectBackoff};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use timer_core::BusSettings;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

const KEEP_ALIVE: Duration = Duration::from_secs(60);
const REQUEST_CAPACITY: usize = 64;
const INBOX_CAPACITY: usize = 256;
const QOS: QoS = QoS::AtMostOnce;

/// Connection events and inbound payloads from the bus task
pub struct Inbox {
    rx: mpsc::Receiver<BusEvent>,
}

impl Inbox {
    /// Wait for the next event; `None` once the bus task has stopped
    pub async fn recv(&mut self) -> Option<BusEvent> {
        self.rx.recv().await
    }
}

/// Bus adapter backed by an MQTT broker connection
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
    connected: Arc<AtomicBool>,
}

impl MqttBus {
    /// Start connecting to the broker in the background
    ///
    /// Returns immediately. The connection is retried forever with
    /// [`ReconnectBackoff`] pacing, and the controller topic is subscribed
    /// on every (re)connect. Must be called within a tokio runtime.
    pub fn connect(settings: &BusSettings) -> (Self, Inbox) {
        let client_id = settings
            .client_id
            .clone()
            .unwrap_or_else(|| format!("timerd-{}", std::process::id()));

        let mut options = MqttOptions::new(client_id, &settings.broker, settings.port);
        options.set_keep_alive(KEEP_ALIVE);
        options.set_clean_session(true);

        let (client, eventloop) = AsyncClient::new(options, REQUEST_CAPACITY);
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let connected = Arc::new(AtomicBool::new(false));

        info!(
            broker = %settings.broker,
            port = settings.port,
            topic = %settings.topic,
            "connecting to broker"
        );
        tokio::spawn(run_event_loop(
            eventloop,
            client.clone(),
            settings.topic.clone(),
            tx,
            connected.clone(),
        ));

        (Self { client, connected }, Inbox { rx })
    }

    /// Ask the broker to close the connection
    pub async fn disconnect(&self) {
        if let Err(e) = self.client.disconnect().await {
            debug!(error = %e, "disconnect request failed");
        }
    }
}

#[async_trait]
impl BusAdapter for MqttBus {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), BusError> {
        if !self.is_connected() {
            return Err(BusError::NotConnected);
        }
        self.client
            .publish(topic, QOS, false, payload.as_bytes().to_vec())
            .await
            .map_err(|e| BusError::PublishFailed {
                topic: topic.to_string(),
                message: e.to_string(),
            })
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Queue an event for the owner without blocking the poll loop
///
/// The poll loop must keep running while the owner is busy publishing, so a
/// full inbox drops the event. Returns false once the inbox is closed.
fn deliver(inbox: &mpsc::Sender<BusEvent>, event: BusEvent) -> bool {
    match inbox.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(BusEvent::Message(payload))) => {
            warn!(bytes = payload.len(), "inbox full, dropping inbound message");
            true
        }
        Err(TrySendError::Full(BusEvent::Connected)) => {
            warn!("inbox full, dropping connect notice");
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

async fn run_event_loop(
    mut eventloop: EventLoop,
    client: AsyncClient,
    topic: String,
    inbox: mpsc::Sender<BusEvent>,
    connected: Arc<AtomicBool>,
) {
    let mut backoff = ReconnectBackoff::default();

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                info!(code = ?ack.code, "connected to broker");
                backoff.reset();
                connected.store(true, Ordering::SeqCst);
                // Subscribing on every ConnAck renews the subscription after a reconnect
                if let Err(e) = client.try_subscribe(topic.as_str(), QOS) {
                    error!(topic = %topic, error = %e, "subscribe failed");
                }
                if !deliver(&inbox, BusEvent::Connected) {
                    debug!("inbox closed, stopping bus event loop");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if !deliver(&inbox, BusEvent::Message(publish.payload.to_vec())) {
                    debug!("inbox closed, stopping bus event loop");
                    break;
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                connected.store(false, Ordering::SeqCst);
                warn!("broker disconnect");
            }
            Ok(_) => {}
            Err(e) => {
                if connected.swap(false, Ordering::SeqCst) {
                    warn!("broker disconnect");
                }
                let delay = backoff.next_delay();
                error!(
                    error = %e,
                    attempt = backoff.failures(),
                    retry_in_secs = delay.as_secs(),
                    "connect to broker failed"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "mqtt_tests.rs"]
mod tests;
