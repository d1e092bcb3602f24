// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Weekly schedule resolution
//!
//! A remote's raw schedule is a list of `(time-of-day, state, days)` rules.
//! Each reprocessing cycle expands those rules into one [`WeeklyEntry`] per
//! active weekday, keyed by a [`WeekKey`], and sorts them descending. The
//! week is cyclic: before the first entry of the week, the last entry of the
//! previous week is still in effect.

use chrono::{Datelike, NaiveDateTime, Timelike};
use rand::Rng;
use std::fmt;

/// Day tags indexed by weekday, Monday first
pub const DAY_TAGS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

const ALL_DAYS: &str = "sun mon tue wed thu fri sat";
const WEEKDAYS: &str = "mon tue wed thu fri";
const WEEKENDS: &str = "sat sun";

/// Minutes since local midnight, always within `0..=1439`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const LAST_MINUTE: u16 = 1439;

    /// Build from minutes since midnight
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= Self::LAST_MINUTE).then_some(Self(minutes))
    }

    /// Build from an `HHMM` integer such as `700` or `2215`
    pub fn from_hhmm(hhmm: i64) -> Option<Self> {
        if !(0..10_000).contains(&hhmm) {
            return None;
        }
        let (hour, minute) = (hhmm / 100, hhmm % 100);
        if hour > 23 || minute > 59 {
            return None;
        }
        Self::from_minutes((hour * 60 + minute) as u16)
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// The `HHMM` integer form, as written in configuration
    pub fn hhmm(self) -> u16 {
        self.hour() * 100 + self.minute()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Normalized day-set string of a schedule rule
///
/// Macros (`all`, `weekdays`, `weekends`) are expanded and the text lowered.
/// Membership is a substring test of the three-letter day tag, so a day field
/// like `"monday tuesday"` matches `mon` and `tue`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DaySet(String);

impl DaySet {
    pub fn parse(raw: &str) -> Self {
        let expanded = raw
            .to_lowercase()
            .replace("all", ALL_DAYS)
            .replace("weekdays", WEEKDAYS)
            .replace("weekends", WEEKENDS);
        Self(expanded)
    }

    /// Whether the rule is active on the weekday with the given Monday-first index
    pub fn is_active_on(&self, day_index: usize) -> bool {
        DAY_TAGS
            .get(day_index)
            .is_some_and(|tag| self.0.contains(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One raw schedule rule
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScheduleEntry {
    pub time: TimeOfDay,
    pub state: String,
    pub days: DaySet,
}

impl ScheduleEntry {
    pub fn new(time: TimeOfDay, state: impl Into<String>, days: &str) -> Self {
        Self {
            time,
            state: state.into(),
            days: DaySet::parse(days),
        }
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.time.hhmm(),
            self.state,
            self.days.as_str()
        )
    }
}

/// Sortable position within the week: `day * 10000 + hour * 100 + minute`
///
/// This is an ordering key only. The `hhmm` part never reaches 10000, so keys
/// order correctly within and across days, but the difference of two keys is
/// not a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey(u32);

impl WeekKey {
    pub fn new(day_index: u32, time: TimeOfDay) -> Self {
        Self(day_index * 10_000 + u32::from(time.hhmm()))
    }

    /// Key of a local wall-clock reading
    pub fn at(now: NaiveDateTime) -> Self {
        let day = now.weekday().num_days_from_monday();
        let minutes = (now.hour() * 60 + now.minute()) as u16;
        Self::new(day, TimeOfDay(minutes))
    }

    pub fn day_index(self) -> u32 {
        self.0 / 10_000
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A schedule rule resolved to a single point in the week
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeeklyEntry {
    pub key: WeekKey,
    pub state: String,
}

impl fmt::Display for WeeklyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.key, self.state)
    }
}

/// Shift a time of day by a uniform draw from `[-jitter, +jitter]` minutes
///
/// The result is clamped to the same day; it never wraps past midnight.
pub fn randomize<R: Rng>(time: TimeOfDay, jitter: u32, rng: &mut R) -> TimeOfDay {
    if jitter == 0 {
        return time;
    }
    let jitter = i64::from(jitter);
    let shifted = i64::from(time.minutes()) + rng.gen_range(-jitter..=jitter);
    TimeOfDay(shifted.clamp(0, i64::from(TimeOfDay::LAST_MINUTE)) as u16)
}

/// A remote's expanded week, sorted descending by [`WeekKey`]
///
/// Built once per reprocessing cycle and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSchedule {
    entries: Vec<WeeklyEntry>,
}

impl WeekSchedule {
    /// Expand raw rules over the seven weekdays, applying jitter per instance
    pub fn build<R: Rng>(rules: &[ScheduleEntry], jitter: u32, rng: &mut R) -> Self {
        let mut entries = Vec::new();
        for day in 0..DAY_TAGS.len() {
            for rule in rules.iter().filter(|r| r.days.is_active_on(day)) {
                let time = randomize(rule.time, jitter, rng);
                entries.push(WeeklyEntry {
                    key: WeekKey::new(day as u32, time),
                    state: rule.state.clone(),
                });
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Self { entries }
    }

    /// The entry in effect at `now`, or `None` when the week has no entries
    pub fn resolve(&self, now: WeekKey) -> Option<&WeeklyEntry> {
        let latest = self.entries.first()?;
        let earliest = self.entries.last()?;

        // Before the week's first entry, or at/after its last: the last entry
        // carries over cyclically.
        if now < earliest.key || now >= latest.key {
            return Some(latest);
        }
        self.entries.iter().find(|entry| entry.key <= now)
    }

    pub fn entries(&self) -> &[WeeklyEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
