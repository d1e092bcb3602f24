// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-flight command tracking with bounded retries
//!
//! Every published command is tracked under its correlation token until the
//! remote acknowledges it. Each sweep either resends an entry (consuming one
//! retry) or, once retries are used up, drops it and reports the remote as
//! exhausted. Delivery is at-least-once with a bounded number of attempts.

use crate::id::IdGen;
use crate::schedule::WeeklyEntry;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Resends allowed after the initial publish
pub const DEFAULT_RETRIES: u32 = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("token {0} is already outstanding")]
    TokenCollision(String),
}

/// A command awaiting acknowledgement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelivery {
    pub token: String,
    pub remote: String,
    pub payload: WeeklyEntry,
    pub retries_remaining: u32,
}

/// What a sweep wants done
#[derive(Debug, Default)]
pub struct SweepOutcome {
    /// Deliveries to republish under their existing token
    pub resend: Vec<PendingDelivery>,
    /// Deliveries dropped because no retries were left
    pub exhausted: Vec<PendingDelivery>,
}

impl SweepOutcome {
    /// Distinct remotes whose deliveries were exhausted
    pub fn exhausted_remotes(&self) -> BTreeSet<&str> {
        self.exhausted.iter().map(|d| d.remote.as_str()).collect()
    }
}

/// Outstanding deliveries keyed by token
#[derive(Debug)]
pub struct DeliveryTracker<I: IdGen> {
    pending: BTreeMap<String, PendingDelivery>,
    id_gen: I,
    retries: u32,
}

impl<I: IdGen> DeliveryTracker<I> {
    pub fn new(id_gen: I) -> Self {
        Self::with_retries(id_gen, DEFAULT_RETRIES)
    }

    pub fn with_retries(id_gen: I, retries: u32) -> Self {
        Self {
            pending: BTreeMap::new(),
            id_gen,
            retries,
        }
    }

    /// Start tracking a command and return the token to publish it under
    pub fn track(&mut self, remote: &str, payload: WeeklyEntry) -> Result<String, DeliveryError> {
        let token = self.id_gen.next();
        if self.pending.contains_key(&token) {
            return Err(DeliveryError::TokenCollision(token));
        }
        self.pending.insert(
            token.clone(),
            PendingDelivery {
                token: token.clone(),
                remote: remote.to_string(),
                payload,
                retries_remaining: self.retries,
            },
        );
        Ok(token)
    }

    /// Stop tracking `token`. Unknown or stale tokens are ignored.
    pub fn acknowledge(&mut self, token: &str) -> Option<PendingDelivery> {
        self.pending.remove(token)
    }

    /// Consume one retry from every delivery, dropping those with none left
    pub fn sweep(&mut self) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();
        let mut spent = Vec::new();

        for (token, delivery) in self.pending.iter_mut() {
            if delivery.retries_remaining > 0 {
                delivery.retries_remaining -= 1;
                outcome.resend.push(delivery.clone());
            } else {
                spent.push(token.clone());
            }
        }

        // Removal happens after iteration so unvisited entries are unaffected
        for token in spent {
            if let Some(delivery) = self.pending.remove(&token) {
                outcome.exhausted.push(delivery);
            }
        }

        outcome
    }

    /// Drop every delivery addressed to `remote`; returns how many were dropped
    pub fn clear_remote(&mut self, remote: &str) -> usize {
        let before = self.pending.len();
        self.pending.retain(|_, d| d.remote != remote);
        before - self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn get(&self, token: &str) -> Option<&PendingDelivery> {
        self.pending.get(token)
    }

    pub fn pending_for<'a>(&'a self, remote: &'a str) -> impl Iterator<Item = &'a PendingDelivery> {
        self.pending.values().filter(move |d| d.remote == remote)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Token generator shared with untracked probes
    pub fn id_gen(&self) -> &I {
        &self.id_gen
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
