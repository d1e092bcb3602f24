// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch orchestration across all remotes
//!
//! The dispatcher owns every piece of mutable state: the remote table, the
//! delivery tracker and the offline registry. All entry points take
//! `&mut self`, so a single owner (the daemon's event loop) serializes
//! ticks, inbound messages and reloads.

use crate::error::DispatchError;
use async_trait::async_trait;
use timer_adapters::{BusAdapter, InboundHandler};
use timer_core::{
    nearest_second, Clock, DeliveryTracker, IdGen, Inbound, OfflineRegistry, Outbound, Remote,
    Resolution, WeekKey, WeeklyEntry,
};
use tracing::{debug, error, info, warn};

/// Drives remotes to their scheduled state over the bus
pub struct Dispatcher<B: BusAdapter, C: Clock, I: IdGen> {
    remotes: Vec<Remote>,
    tracker: DeliveryTracker<I>,
    offline: OfflineRegistry,
    bus: B,
    clock: C,
}

impl<B, C, I> Dispatcher<B, C, I>
where
    B: BusAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(remotes: Vec<Remote>, bus: B, clock: C, id_gen: I) -> Self {
        Self::with_tracker(remotes, bus, clock, DeliveryTracker::new(id_gen))
    }

    /// Create a dispatcher around a preconfigured tracker
    pub fn with_tracker(
        remotes: Vec<Remote>,
        bus: B,
        clock: C,
        tracker: DeliveryTracker<I>,
    ) -> Self {
        Self {
            remotes,
            tracker,
            offline: OfflineRegistry::new(),
            bus,
            clock,
        }
    }

    /// One full tick: resend unacknowledged commands, then dispatch
    pub async fn tick(&mut self) {
        self.sweep_retries().await;
        self.evaluate_tick().await;
    }

    /// Dispatch pass over every enabled remote
    ///
    /// Offline remotes get an untracked probe. Online remotes get a tracked
    /// command only when the entry in effect differs from the last one sent.
    pub async fn evaluate_tick(&mut self) {
        let now = WeekKey::at(nearest_second(self.clock.now()));

        for remote in self.remotes.iter_mut() {
            if !remote.is_enabled() {
                continue;
            }

            if self.offline.is_offline(remote.name()) {
                let token = self.tracker.id_gen().next();
                debug!(remote = remote.name(), token = %token, "probing offline remote");
                let probe = Outbound::Probe { token };
                if let Err(e) = self.bus.publish(remote.name(), &probe.to_string()).await {
                    warn!(remote = remote.name(), error = %e, "probe not sent");
                }
                continue;
            }

            match remote.advance(now) {
                Resolution::NoEntry => {
                    debug!(remote = remote.name(), "no schedule entry in effect");
                }
                Resolution::Unchanged => {}
                Resolution::Changed(entry) => {
                    let sent =
                        send_command(&mut self.tracker, &self.bus, remote.name(), entry).await;
                    match sent {
                        Ok(()) => {}
                        Err(DispatchError::Delivery(e)) => {
                            // Nothing was sent; retry on the next pass
                            error!(remote = remote.name(), error = %e, "command not tracked");
                            remote.forget_dispatch();
                        }
                        Err(e) => {
                            // Still tracked, so the retry sweep resends it
                            warn!(remote = remote.name(), error = %e, "command publish failed");
                        }
                    }
                }
            }
        }
    }

    /// Resend unacknowledged commands and demote remotes that ran out of retries
    pub async fn sweep_retries(&mut self) {
        let outcome = self.tracker.sweep();

        for delivery in &outcome.resend {
            info!(
                remote = %delivery.remote,
                token = %delivery.token,
                state = %delivery.payload.state,
                retries_left = delivery.retries_remaining,
                "resending unacknowledged command"
            );
            let command = Outbound::Command {
                state: delivery.payload.state.clone(),
                token: delivery.token.clone(),
            };
            if let Err(e) = self.bus.publish(&delivery.remote, &command.to_string()).await {
                warn!(remote = %delivery.remote, error = %e, "resend failed");
            }
        }

        for remote in outcome.exhausted_remotes() {
            if self.offline.mark_offline(remote) {
                let dropped = self.tracker.clear_remote(remote);
                warn!(remote, dropped, "no acknowledgement after retries, marking offline");
            }
        }
    }

    /// Route one inbound message
    pub async fn on_message(&mut self, payload: &[u8]) -> Result<(), DispatchError> {
        match Inbound::parse(payload)? {
            Inbound::Ack { remote, token } => match self.tracker.acknowledge(&token) {
                Some(delivery) => {
                    info!(
                        remote = %remote,
                        token = %token,
                        state = %delivery.payload.state,
                        "command acknowledged"
                    );
                }
                None => debug!(remote = %remote, token = %token, "ignoring ack for unknown token"),
            },
            Inbound::Pong { remote, payload } | Inbound::Reset { remote, payload } => {
                info!(remote = %remote, payload = %payload, "remote is alive");
                self.bring_online(&remote);
                self.evaluate_tick().await;
            }
            Inbound::Unknown { remote, verb } => {
                warn!(remote = %remote, verb = %verb, "ignoring unknown message");
            }
        }
        Ok(())
    }

    /// Replace the remote set and drop all delivery state
    pub fn reload(&mut self, remotes: Vec<Remote>) {
        info!(
            remotes = remotes.len(),
            dropped_deliveries = self.tracker.len(),
            offline = self.offline.len(),
            "reloading remotes"
        );
        self.remotes = remotes;
        self.tracker.clear();
        self.offline.clear();
    }

    fn bring_online(&mut self, name: &str) {
        if self.offline.mark_online(name) {
            info!(remote = name, "remote back online");
        }
        let cleared = self.tracker.clear_remote(name);
        if cleared > 0 {
            debug!(remote = name, cleared, "dropped stale deliveries");
        }
        if let Some(remote) = self.remotes.iter_mut().find(|r| r.name() == name) {
            remote.forget_dispatch();
        }
    }

    pub fn remotes(&self) -> &[Remote] {
        &self.remotes
    }

    pub fn remote(&self, name: &str) -> Option<&Remote> {
        self.remotes.iter().find(|r| r.name() == name)
    }

    pub fn tracker(&self) -> &DeliveryTracker<I> {
        &self.tracker
    }

    pub fn offline(&self) -> &OfflineRegistry {
        &self.offline
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

#[async_trait]
impl<B, C, I> InboundHandler for Dispatcher<B, C, I>
where
    B: BusAdapter,
    C: Clock,
    I: IdGen,
{
    async fn handle(&mut self, payload: &[u8]) {
        if let Err(e) = self.on_message(payload).await {
            warn!(error = %e, "dropping inbound message");
        }
    }
}

/// Track a command and publish it on the remote's topic
///
/// A publish failure leaves the delivery tracked.
async fn send_command<B: BusAdapter, I: IdGen>(
    tracker: &mut DeliveryTracker<I>,
    bus: &B,
    remote: &str,
    entry: WeeklyEntry,
) -> Result<(), DispatchError> {
    let state = entry.state.clone();
    let token = tracker.track(remote, entry)?;
    info!(remote, token = %token, state = %state, "dispatching");
    let command = Outbound::Command { state, token };
    bus.publish(remote, &command.to_string()).await?;
    Ok(())
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
