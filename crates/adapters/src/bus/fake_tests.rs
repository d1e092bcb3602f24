// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_bus_records_publishes() {
    let bus = FakeBus::new();

    bus.publish("porch", "on 0001").await.unwrap();
    bus.publish("garage", "Ping 0002").await.unwrap();

    let calls = bus.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].topic, "porch");
    assert_eq!(calls[0].payload, "on 0001");
    assert_eq!(bus.payloads(), vec!["on 0001", "Ping 0002"]);
}

#[tokio::test]
async fn fake_bus_injected_failure_still_records() {
    let bus = FakeBus::new();
    bus.fail_publishes(true);

    let result = bus.publish("porch", "on 0001").await;
    assert!(matches!(result, Err(BusError::PublishFailed { .. })));
    assert_eq!(bus.calls().len(), 1);

    bus.fail_publishes(false);
    assert!(bus.publish("porch", "on 0001").await.is_ok());
}

#[test]
fn fake_bus_connection_toggle_is_shared_across_clones() {
    let bus = FakeBus::new();
    let clone = bus.clone();
    assert!(clone.is_connected());

    bus.set_connected(false);
    assert!(!clone.is_connected());
}

#[tokio::test]
async fn fake_bus_clear_forgets_calls() {
    let bus = FakeBus::new();
    bus.publish("porch", "on 0001").await.unwrap();
    bus.clear();
    assert!(bus.calls().is_empty());
}
