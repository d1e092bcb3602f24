// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of remotes presumed unreachable
//!
//! A remote enters only through retry exhaustion and leaves only when it
//! answers a probe (or announces a reset).

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct OfflineRegistry {
    remotes: BTreeSet<String>,
}

impl OfflineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a remote offline. Returns true if it was online before.
    pub fn mark_offline(&mut self, remote: &str) -> bool {
        self.remotes.insert(remote.to_string())
    }

    /// Mark a remote online. Returns true if it was offline before.
    pub fn mark_online(&mut self, remote: &str) -> bool {
        self.remotes.remove(remote)
    }

    pub fn is_offline(&self, remote: &str) -> bool {
        self.remotes.contains(remote)
    }

    pub fn len(&self) -> usize {
        self.remotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remotes.is_empty()
    }

    pub fn clear(&mut self) {
        self.remotes.clear();
    }
}

#[cfg(test)]
#[path = "offline_tests.rs"]
mod tests;
