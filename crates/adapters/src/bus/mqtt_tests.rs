// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn deliver_queues_events_in_order() {
    let (tx, mut rx) = mpsc::channel(4);

    assert!(deliver(&tx, BusEvent::Connected));
    assert!(deliver(&tx, BusEvent::Message(b"porch ack tok-1".to_vec())));

    assert_eq!(rx.try_recv().unwrap(), BusEvent::Connected);
    assert_eq!(
        rx.try_recv().unwrap(),
        BusEvent::Message(b"porch ack tok-1".to_vec())
    );
}

#[test]
fn full_inbox_drops_events_without_waiting() {
    let (tx, mut rx) = mpsc::channel(1);

    assert!(deliver(&tx, BusEvent::Message(b"porch ack tok-1".to_vec())));
    assert!(deliver(&tx, BusEvent::Message(b"porch ack tok-2".to_vec())));
    assert!(deliver(&tx, BusEvent::Connected));

    assert_eq!(
        rx.try_recv().unwrap(),
        BusEvent::Message(b"porch ack tok-1".to_vec())
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn closed_inbox_stops_delivery() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    assert!(!deliver(&tx, BusEvent::Connected));
}
