// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the dispatcher

use thiserror::Error;
use timer_adapters::BusError;
use timer_core::{DeliveryError, MessageError};

/// Errors that can occur while dispatching
///
/// None of these are fatal to the dispatcher; callers log and carry on.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed message: {0}")]
    Message(#[from] MessageError),
    #[error("delivery error: {0}")]
    Delivery(#[from] DeliveryError),
    #[error("bus error: {0}")]
    Bus(#[from] BusError),
}
