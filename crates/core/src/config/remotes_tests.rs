// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use yare::parameterized;

fn build(name: &str, yaml: &str) -> Result<Remote, RemoteError> {
    let key = Value::String(name.to_string());
    let value: Value = serde_yaml::from_str(yaml).unwrap();
    build_remote(&key, &value, &mut StdRng::seed_from_u64(11))
}

#[test]
fn builds_remote_with_defaults() {
    let remote = build("porch", "sched: [[700, on, weekdays], [2200, off, all]]").unwrap();
    assert_eq!(remote.name(), "porch");
    assert!(remote.is_enabled());
    assert_eq!(remote.jitter(), 0);
    assert_eq!(remote.schedule().len(), 2);
    assert_eq!(remote.week().len(), 12);
}

#[test]
fn builds_remote_with_explicit_fields() {
    let remote = build(
        "garage",
        "enabled: false\nrandom: 15\nsched:\n  - [1830, 'on', 'Mon Wed']\n",
    )
    .unwrap();
    assert!(!remote.is_enabled());
    assert_eq!(remote.jitter(), 15);
    assert_eq!(remote.schedule()[0].days.as_str(), "mon wed");
    assert_eq!(remote.week().len(), 2);
}

#[test]
fn non_string_states_keep_their_text() {
    let remote = build("fan", "sched: [[600, true, all], [1200, 3, all], [1800, 0.5, all]]").unwrap();
    let states: Vec<&str> = remote.schedule().iter().map(|e| e.state.as_str()).collect();
    assert_eq!(states, vec!["true", "3", "0.5"]);
}

#[test]
fn empty_schedule_is_allowed() {
    let remote = build("idle", "sched: []").unwrap();
    assert!(remote.week().is_empty());
}

#[parameterized(
    not_a_mapping = { "[1, 2]", "remote" },
    missing_sched = { "random: 3", "sched" },
    sched_not_a_list = { "sched: nightly", "sched" },
    enabled_not_bool = { "enabled: maybe\nsched: []", "enabled" },
    random_negative = { "random: -5\nsched: []", "random" },
    random_not_number = { "random: lots\nsched: []", "random" },
    entry_too_short = { "sched: [[700, on]]", "sched[0]" },
    entry_not_a_list = { "sched: [700]", "sched[0]" },
    time_not_integer = { "sched: [['7am', on, all]]", "sched[0].time" },
    time_out_of_range = { "sched: [[700, on, all], [2460, off, all]]", "sched[1].time" },
    state_is_a_list = { "sched: [[700, [on], all]]", "sched[0].state" },
    days_not_string = { "sched: [[700, on, 5]]", "sched[0].days" },
)]
fn reports_failing_field(yaml: &str, expected_field: &str) {
    let err = build("porch", yaml).unwrap_err();
    assert_eq!(err.remote, "porch");
    assert_eq!(err.field, expected_field);
}

#[test]
fn error_message_names_remote_and_field() {
    let err = build("porch", "random: 1").unwrap_err();
    assert_eq!(err.to_string(), "remote 'porch': sched: missing required field");
}

#[test]
fn numeric_remote_names_are_accepted() {
    let key = Value::Number(42.into());
    let value: Value = serde_yaml::from_str("sched: []").unwrap();
    let remote = build_remote(&key, &value, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(remote.name(), "42");
}
