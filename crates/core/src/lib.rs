// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! timer-core: schedule resolution and delivery state for remote timers
//!
//! This crate provides:
//! - Weekly schedule expansion, jitter and resolution
//! - The per-remote dispatch memory
//! - Delivery tracking with bounded retries and the offline registry
//! - The plain-text wire format
//! - YAML configuration loading

pub mod clock;
pub mod id;

pub mod config;
pub mod delivery;
pub mod message;
pub mod offline;
pub mod remote;
pub mod schedule;

// Re-exports
pub use clock::{nearest_second, until_next_minute, Clock, FakeClock, SystemClock};
pub use config::{
    load_config, parse_config, BusSettings, ConfigError, LoadedConfig, RemoteError,
};
pub use delivery::{
    DeliveryError, DeliveryTracker, PendingDelivery, SweepOutcome, DEFAULT_RETRIES,
};
pub use id::{HexTokenGen, IdGen, SequentialIdGen};
pub use message::{Inbound, MessageError, Outbound};
pub use offline::OfflineRegistry;
pub use remote::{Remote, Resolution};
pub use schedule::{DaySet, ScheduleEntry, TimeOfDay, WeekKey, WeekSchedule, WeeklyEntry};
