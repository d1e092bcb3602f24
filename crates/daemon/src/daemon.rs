// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Main event loop

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use timer_adapters::{BusAdapter, BusEvent, InboundHandler, MqttBus, TracedBus};
use timer_core::{
    load_config, nearest_second, until_next_minute, Clock, HexTokenGen, IdGen, LoadedConfig,
    SystemClock,
};
use timer_engine::Dispatcher;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::{debug, error, info};

use crate::lifecycle::{reload_config, LifecycleError};

/// Dispatcher with concrete adapter types (wrapped with tracing)
pub type DaemonDispatcher = Dispatcher<TracedBus<MqttBus>, SystemClock, HexTokenGen>;

/// Detects local calendar day changes between ticks
#[derive(Debug, Clone, Copy)]
pub struct DayWatch {
    current: NaiveDate,
}

impl DayWatch {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            current: now.date(),
        }
    }

    /// Record `now`; true when it falls on a different day than last seen
    pub fn roll(&mut self, now: NaiveDateTime) -> bool {
        let today = now.date();
        if today == self.current {
            return false;
        }
        self.current = today;
        true
    }
}

struct Signals {
    hangup: Signal,
    terminate: Signal,
    interrupt: Signal,
}

impl Signals {
    fn install() -> Result<Self, LifecycleError> {
        Ok(Self {
            hangup: signal(SignalKind::hangup())?,
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
        })
    }
}

/// Run until SIGTERM or SIGINT
pub async fn run(config_path: &Path) -> Result<(), LifecycleError> {
    let mut signals = Signals::install()?;

    let Some(loaded) = initial_config(config_path, &mut signals).await else {
        return Ok(());
    };

    let (mqtt, mut inbox) = MqttBus::connect(&loaded.bus);
    let mut dispatcher: DaemonDispatcher = Dispatcher::new(
        loaded.remotes,
        TracedBus::new(mqtt.clone()),
        SystemClock,
        HexTokenGen,
    );
    let mut day = DayWatch::new(nearest_second(dispatcher.clock().now()));

    info!(remotes = dispatcher.remotes().len(), "daemon ready");

    loop {
        let wait = until_next_minute(nearest_second(dispatcher.clock().now()));

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                on_minute(&mut dispatcher, &mut day, config_path).await;
            }

            Some(event) = inbox.recv() => {
                on_bus_event(&mut dispatcher, event).await;
            }

            _ = signals.hangup.recv() => {
                info!("Received SIGHUP, reloading configuration");
                if reload_config(&mut dispatcher, config_path) {
                    dispatcher.evaluate_tick().await;
                }
            }

            _ = signals.terminate.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            _ = signals.interrupt.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }
        }
    }

    // In-flight deliveries are abandoned
    if !dispatcher.tracker().is_empty() {
        info!(pending = dispatcher.tracker().len(), "abandoning unacknowledged commands");
    }
    mqtt.disconnect().await;
    info!("Daemon stopped");
    Ok(())
}

/// Minute boundary: daily reprocess on a new day, otherwise sweep and dispatch
///
/// Skipped entirely while the broker is unreachable.
pub async fn on_minute<B, C, I>(
    dispatcher: &mut Dispatcher<B, C, I>,
    day: &mut DayWatch,
    config_path: &Path,
) where
    B: BusAdapter,
    C: Clock,
    I: IdGen,
{
    if !dispatcher.bus().is_connected() {
        debug!("broker not connected, skipping tick");
        return;
    }

    if day.roll(nearest_second(dispatcher.clock().now())) {
        info!("new day, reprocessing schedules");
        reload_config(dispatcher, config_path);
        dispatcher.evaluate_tick().await;
    } else {
        dispatcher.tick().await;
    }
}

/// React to the bus task
///
/// A (re)connect dispatches right away instead of waiting for the next
/// minute boundary.
pub async fn on_bus_event<B, C, I>(dispatcher: &mut Dispatcher<B, C, I>, event: BusEvent)
where
    B: BusAdapter,
    C: Clock,
    I: IdGen,
{
    match event {
        BusEvent::Connected => {
            info!("broker connected, dispatching");
            dispatcher.evaluate_tick().await;
        }
        BusEvent::Message(payload) => dispatcher.handle(&payload).await,
    }
}

/// Load the configuration, waiting for SIGHUP while it is unusable
///
/// Returns `None` if asked to stop first.
async fn initial_config(path: &Path, signals: &mut Signals) -> Option<LoadedConfig> {
    loop {
        match load_config(path, &mut rand::thread_rng()) {
            Ok(loaded) => {
                info!(
                    path = %path.display(),
                    remotes = loaded.remotes.len(),
                    "configuration loaded"
                );
                return Some(loaded);
            }
            Err(e) => {
                error!(
                    path = %path.display(),
                    error = %e,
                    "cannot start without a configuration, waiting for SIGHUP"
                );
            }
        }

        tokio::select! {
            _ = signals.hangup.recv() => {
                info!("Received SIGHUP, retrying configuration");
            }
            _ = signals.terminate.recv() => {
                info!("Received SIGTERM, shutting down...");
                return None;
            }
            _ = signals.interrupt.recv() => {
                info!("Received SIGINT, shutting down...");
                return None;
            }
        }
    }
}

#[cfg(test)]
#[path = "daemon_tests.rs"]
mod tests;
