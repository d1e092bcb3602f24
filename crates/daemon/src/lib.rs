// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Remote timer daemon (timerd)
//!
//! Loads the remote schedules, connects to the broker and drives every
//! remote to its scheduled state once a minute.

pub mod args;
pub mod check;
pub mod daemon;
pub mod lifecycle;

pub use args::Args;
pub use lifecycle::LifecycleError;
