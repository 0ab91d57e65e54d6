// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

const T: &str = "harvesterhci.io.supportbundle";

fn progress(p: u32) -> ResourceSnapshot {
    ResourceSnapshot::new(json!({ "status": { "progress": p } }))
}

#[tokio::test]
async fn unforced_find_prefers_push_cache() {
    let store = FakeResourceStore::new();
    store.insert(T, "ns/foo", progress(10));
    store.set_live(T, "ns/foo", progress(90));

    assert_eq!(store.find(T, "ns/foo", false).await.unwrap(), progress(10));
    assert_eq!(store.by_id(T, "ns/foo"), Some(progress(10)));
}

#[tokio::test]
async fn forced_find_reads_backend_and_refreshes_cache() {
    let store = FakeResourceStore::new();
    store.insert(T, "ns/foo", progress(10));
    store.set_live(T, "ns/foo", progress(90));

    assert_eq!(store.find(T, "ns/foo", true).await.unwrap(), progress(90));
    assert_eq!(store.by_id(T, "ns/foo"), Some(progress(90)));
}

#[tokio::test]
async fn unknown_resource_is_not_found() {
    let store = FakeResourceStore::new();
    let err = store.find(T, "ns/missing", false).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn scripted_failures_are_consumed_in_order() {
    let store = FakeResourceStore::new();
    store.insert(T, "ns/foo", progress(10));
    store.fail_next_find(StoreError::Transport("reset".to_string()));

    assert!(store.find(T, "ns/foo", true).await.is_err());
    assert!(store.find(T, "ns/foo", true).await.is_ok());
}

#[tokio::test]
async fn calls_are_recorded() {
    let store = FakeResourceStore::new();
    store.insert(T, "ns/foo", progress(10));

    let _ = store.find(T, "ns/foo", false).await;
    let _ = store.by_id(T, "ns/foo");
    let _ = store.find(T, "ns/foo", true).await;

    assert_eq!(store.calls().len(), 3);
    assert_eq!(store.find_modes(), vec![false, true]);

    store.clear_calls();
    assert!(store.calls().is_empty());
}
