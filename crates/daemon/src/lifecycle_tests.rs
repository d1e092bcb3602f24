// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use timer_adapters::FakeBus;
use timer_core::{FakeClock, Remote, ScheduleEntry, SequentialIdGen, TimeOfDay};

const TWO_REMOTES: &str = r#"
mqtt:
  broker: localhost
remotes:
  porch:
    sched:
      - [700, "on", "weekdays"]
  garage:
    enabled: false
    sched:
      - [600, "open", "all"]
"#;

type TestDispatcher = Dispatcher<FakeBus, FakeClock, SequentialIdGen>;

fn dispatcher_with_shed() -> TestDispatcher {
    let shed = Remote::new(
        "shed",
        true,
        0,
        vec![ScheduleEntry::new(TimeOfDay::from_hhmm(0).unwrap(), "on", "all")],
        &mut StdRng::seed_from_u64(3),
    );
    let now = NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    Dispatcher::new(
        vec![shed],
        FakeBus::new(),
        FakeClock::at(now),
        SequentialIdGen::new("tok"),
    )
}

#[test]
fn pid_file_holds_current_pid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timerd.pid");

    let pid_file = PidFile::acquire(&path).unwrap();
    let content = std::fs::read_to_string(pid_file.path()).unwrap();
    assert_eq!(content.trim(), std::process::id().to_string());
}

#[test]
fn pid_file_lock_is_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timerd.pid");

    let _held = PidFile::acquire(&path).unwrap();
    let err = PidFile::acquire(&path).unwrap_err();
    assert!(matches!(err, LifecycleError::LockFailed(..)));

    // The holder's PID is left intact
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim(), std::process::id().to_string());
}

#[test]
fn released_pid_file_is_removed_and_reusable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timerd.pid");

    PidFile::acquire(&path).unwrap().release();
    assert!(!path.exists());
    assert!(PidFile::acquire(&path).is_ok());
}

#[test]
fn pid_file_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = PidFile::acquire(&dir.path().join("missing/timerd.pid")).unwrap_err();
    assert!(matches!(err, LifecycleError::Io(_)));
}

#[test]
fn reload_replaces_remotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, TWO_REMOTES).unwrap();
    let mut dispatcher = dispatcher_with_shed();

    assert!(reload_config(&mut dispatcher, &path));
    let names: Vec<&str> = dispatcher.remotes().iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["porch", "garage"]);
}

#[test]
fn reload_failure_keeps_previous_remotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "remotes: [not, a, mapping").unwrap();
    let mut dispatcher = dispatcher_with_shed();

    assert!(!reload_config(&mut dispatcher, &path));
    assert!(!reload_config(&mut dispatcher, &dir.path().join("absent.yaml")));
    assert_eq!(dispatcher.remotes().len(), 1);
    assert!(dispatcher.remote("shed").is_some());
}

#[tokio::test]
async fn reload_failure_keeps_delivery_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut dispatcher = dispatcher_with_shed();
    dispatcher.evaluate_tick().await;
    assert_eq!(dispatcher.tracker().len(), 1);

    assert!(!reload_config(&mut dispatcher, &dir.path().join("absent.yaml")));
    assert_eq!(dispatcher.tracker().len(), 1);
}

#[test]
fn reload_drops_only_broken_remotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        r#"
mqtt:
  broker: localhost
remotes:
  porch:
    sched:
      - [700, "on", "weekdays"]
  garage:
    sched:
      - [2500, "open", "all"]
"#,
    )
    .unwrap();
    let mut dispatcher = dispatcher_with_shed();

    assert!(reload_config(&mut dispatcher, &path));
    assert_eq!(dispatcher.remotes().len(), 1);
    assert!(dispatcher.remote("porch").is_some());
}
