// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::schedule::TimeOfDay;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn time(hhmm: i64) -> TimeOfDay {
    TimeOfDay::from_hhmm(hhmm).unwrap()
}

fn porch() -> Remote {
    Remote::new(
        "porch",
        true,
        0,
        vec![
            ScheduleEntry::new(time(2200), "off", "all"),
            ScheduleEntry::new(time(700), "on", "weekdays"),
        ],
        &mut StdRng::seed_from_u64(0),
    )
}

#[test]
fn first_advance_reports_the_current_entry() {
    let mut remote = porch();
    let resolution = remote.advance(WeekKey::new(0, time(659)));
    let Resolution::Changed(entry) = resolution else {
        panic!("expected a change, got {:?}", resolution);
    };
    assert_eq!(entry.state, "off");
    assert_eq!(remote.last_dispatched(), Some(&entry));
}

#[test]
fn advance_is_idempotent_within_an_entry() {
    let mut remote = porch();
    remote.advance(WeekKey::new(0, time(700)));
    assert_eq!(
        remote.advance(WeekKey::new(0, time(700))),
        Resolution::Unchanged
    );
    assert_eq!(
        remote.advance(WeekKey::new(0, time(1530))),
        Resolution::Unchanged
    );
}

#[test]
fn advance_reports_the_next_boundary() {
    let mut remote = porch();
    remote.advance(WeekKey::new(0, time(659)));
    let resolution = remote.advance(WeekKey::new(0, time(700)));
    assert!(matches!(resolution, Resolution::Changed(ref e) if e.state == "on"));
}

#[test]
fn same_state_at_a_new_boundary_is_still_a_change() {
    let mut remote = porch();
    remote.advance(WeekKey::new(5, time(2200)));
    // Sunday 22:00 is a different entry with the same state
    let resolution = remote.advance(WeekKey::new(6, time(2200)));
    assert!(matches!(resolution, Resolution::Changed(ref e) if e.key.value() == 62200));
}

#[test]
fn forget_dispatch_forces_a_resend() {
    let mut remote = porch();
    remote.advance(WeekKey::new(0, time(800)));
    remote.forget_dispatch();
    assert!(remote.last_dispatched().is_none());
    assert!(matches!(
        remote.advance(WeekKey::new(0, time(800))),
        Resolution::Changed(_)
    ));
}

#[test]
fn remote_without_entries_resolves_to_no_entry() {
    let mut remote = Remote::new(
        "shed",
        true,
        0,
        vec![ScheduleEntry::new(time(700), "on", "someday")],
        &mut StdRng::seed_from_u64(0),
    );
    assert_eq!(remote.advance(WeekKey::new(2, time(1200))), Resolution::NoEntry);
    assert!(remote.last_dispatched().is_none());
}

#[test]
fn render_lists_raw_then_week_schedule() {
    let text = porch().render();
    similar_asserts::assert_eq!(
        text,
        "Remote name: porch\n\
         Enabled: true\n\
         Random factor: 0\n\
         Schedule:\n  \
         [700, on, mon tue wed thu fri]\n  \
         [2200, off, sun mon tue wed thu fri sat]\n\
         Week schedule:\n  \
         [62200, off]\n  \
         [52200, off]\n  \
         [42200, off]\n  \
         [40700, on]\n  \
         [32200, off]\n  \
         [30700, on]\n  \
         [22200, off]\n  \
         [20700, on]\n  \
         [12200, off]\n  \
         [10700, on]\n  \
         [2200, off]\n  \
         [700, on]\n"
    );
}
