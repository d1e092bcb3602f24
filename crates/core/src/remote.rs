// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single scheduled remote and its dispatch memory

use crate::schedule::{ScheduleEntry, WeekKey, WeekSchedule, WeeklyEntry};
use rand::Rng;
use std::fmt::Write as _;

/// Outcome of checking a remote's schedule against the current time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The week has no entries at all; nothing to dispatch
    NoEntry,
    /// The entry in effect is the one already dispatched
    Unchanged,
    /// A different entry is now in effect and must be sent
    Changed(WeeklyEntry),
}

/// A controllable device addressed by its bus topic
#[derive(Debug, Clone)]
pub struct Remote {
    name: String,
    enabled: bool,
    jitter: u32,
    schedule: Vec<ScheduleEntry>,
    week: WeekSchedule,
    last_dispatched: Option<WeeklyEntry>,
}

impl Remote {
    /// Build a remote and roll its weekly schedule for this cycle
    pub fn new<R: Rng>(
        name: impl Into<String>,
        enabled: bool,
        jitter: u32,
        schedule: Vec<ScheduleEntry>,
        rng: &mut R,
    ) -> Self {
        let week = WeekSchedule::build(&schedule, jitter, rng);
        Self {
            name: name.into(),
            enabled,
            jitter,
            schedule,
            week,
            last_dispatched: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn jitter(&self) -> u32 {
        self.jitter
    }

    pub fn schedule(&self) -> &[ScheduleEntry] {
        &self.schedule
    }

    pub fn week(&self) -> &WeekSchedule {
        &self.week
    }

    pub fn last_dispatched(&self) -> Option<&WeeklyEntry> {
        self.last_dispatched.as_ref()
    }

    /// Check the schedule at `now`, remembering a newly effective entry
    pub fn advance(&mut self, now: WeekKey) -> Resolution {
        let Some(current) = self.week.resolve(now) else {
            return Resolution::NoEntry;
        };
        if self.last_dispatched.as_ref() == Some(current) {
            return Resolution::Unchanged;
        }
        let current = current.clone();
        self.last_dispatched = Some(current.clone());
        Resolution::Changed(current)
    }

    /// Forget what was dispatched so the next check resends the current entry
    pub fn forget_dispatch(&mut self) {
        self.last_dispatched = None;
    }

    /// Human-readable listing for the configuration check
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Remote name: {}", self.name);
        let _ = writeln!(out, "Enabled: {}", self.enabled);
        let _ = writeln!(out, "Random factor: {}", self.jitter);
        let _ = writeln!(out, "Schedule:");
        let mut raw: Vec<&ScheduleEntry> = self.schedule.iter().collect();
        raw.sort();
        for entry in raw {
            let _ = writeln!(out, "  {}", entry);
        }
        let _ = writeln!(out, "Week schedule:");
        for entry in self.week.entries() {
            let _ = writeln!(out, "  {}", entry);
        }
        out
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
