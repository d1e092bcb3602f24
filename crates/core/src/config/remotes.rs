// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-remote configuration parsing

use crate::remote::Remote;
use crate::schedule::{ScheduleEntry, TimeOfDay};
use rand::Rng;
use serde_yaml::Value;
use thiserror::Error;

/// A remote whose configuration could not be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote '{remote}': {field}: {reason}")]
pub struct RemoteError {
    pub remote: String,
    /// Path of the offending field, e.g. `sched[2].time`
    pub field: String,
    pub reason: String,
}

impl RemoteError {
    fn new(remote: &str, field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            remote: remote.to_string(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Build a remote from its `remotes.<name>` block
///
/// Shape: `{ enabled?: bool, random?: minutes, sched: [[HHMM, state, days], ...] }`
pub fn build_remote<R: Rng>(
    key: &Value,
    value: &Value,
    rng: &mut R,
) -> Result<Remote, RemoteError> {
    let name = scalar_text(key).ok_or_else(|| {
        RemoteError::new("?", "name", format!("expected a string, got {}", kind(key)))
    })?;

    let table = value
        .as_mapping()
        .ok_or_else(|| RemoteError::new(&name, "remote", "must be a mapping"))?;

    let enabled = match table.get("enabled") {
        None => true,
        Some(v) => v
            .as_bool()
            .ok_or_else(|| RemoteError::new(&name, "enabled", "expected true or false"))?,
    };

    let jitter = match table.get("random") {
        None => 0,
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                RemoteError::new(&name, "random", "expected a non-negative number of minutes")
            })?,
    };

    let sched = table
        .get("sched")
        .ok_or_else(|| RemoteError::new(&name, "sched", "missing required field"))?
        .as_sequence()
        .ok_or_else(|| RemoteError::new(&name, "sched", "expected a list of entries"))?;

    let schedule = sched
        .iter()
        .enumerate()
        .map(|(i, item)| parse_entry(&name, i, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Remote::new(name, enabled, jitter, schedule, rng))
}

fn parse_entry(remote: &str, index: usize, item: &Value) -> Result<ScheduleEntry, RemoteError> {
    let field = |name: &str| format!("sched[{}]{}", index, name);

    let parts = item
        .as_sequence()
        .filter(|parts| parts.len() == 3)
        .ok_or_else(|| RemoteError::new(remote, field(""), "expected [time, state, days]"))?;

    let time = parts[0]
        .as_i64()
        .ok_or_else(|| RemoteError::new(remote, field(".time"), "expected an HHMM integer"))
        .and_then(|hhmm| {
            TimeOfDay::from_hhmm(hhmm).ok_or_else(|| {
                let reason = format!("{} is not a valid HHMM time", hhmm);
                RemoteError::new(remote, field(".time"), reason)
            })
        })?;

    let state = scalar_text(&parts[1]).ok_or_else(|| {
        let reason = format!("expected a scalar, got {}", kind(&parts[1]));
        RemoteError::new(remote, field(".state"), reason)
    })?;

    let days = parts[2].as_str().ok_or_else(|| {
        RemoteError::new(remote, field(".days"), "expected a string of day tags")
    })?;

    Ok(ScheduleEntry::new(time, state, days))
}

/// Textual form of a YAML scalar; `None` for null, lists and mappings
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
#[path = "remotes_tests.rs"]
mod tests;
