// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn foo() -> ResourceId {
    ResourceId::new("ns", "foo")
}

#[test]
fn terminal_events_are_completed_failed_cancelled() {
    let kind = OperationKind::Bundle;
    assert!(Event::Completed { kind, id: foo() }.is_terminal());
    assert!(Event::Cancelled { kind, id: foo() }.is_terminal());
    assert!(Event::Failed {
        kind,
        id: foo(),
        failure: FailureKind::Backend,
        message: "boom".to_string(),
    }
    .is_terminal());

    assert!(!Event::Ready { kind, id: foo() }.is_terminal());
    assert!(!Event::DialogClosed { kind }.is_terminal());
}

#[test]
fn event_json_is_tagged_for_observers() {
    let event = Event::Progress {
        kind: OperationKind::ImageDownload,
        id: foo(),
        progress: 0.5,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "progress");
    assert_eq!(json["kind"], "image_download");
    assert_eq!(json["id"], "ns/foo");
    assert_eq!(event.name(), "operation:progress");
}

#[test]
fn failure_kind_display() {
    assert_eq!(FailureKind::Timeout.to_string(), "timed out");
    assert_eq!(FailureKind::Backend.to_string(), "backend failure");
    assert_eq!(FailureKind::Download.to_string(), "download failed");
}
