// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn store(scope: ClusterScope) -> HttpResourceStore {
    HttpResourceStore::new("https://hci.local/", scope, Duration::from_secs(1))
}

#[test]
fn resource_url_single_cluster() {
    let url = store(ClusterScope::Single).resource_url("harvesterhci.io.supportbundle", "ns/foo");
    assert_eq!(
        url,
        "https://hci.local/v1/harvester/harvesterhci.io.supportbundles/ns/foo"
    );
}

#[test]
fn resource_url_multi_cluster() {
    let url = store(ClusterScope::multi("c-1"))
        .resource_url("harvesterhci.io.virtualmachineimagedownloader", "ns/bar");
    assert_eq!(
        url,
        "https://hci.local/k8s/clusters/c-1/v1/harvester/harvesterhci.io.virtualmachineimagedownloaders/ns/bar"
    );
}

#[test]
fn http_404_maps_to_not_found() {
    let err = map_http_error(ureq::Error::StatusCode(404), "t", "ns/foo");
    assert!(err.is_not_found());

    let err = map_http_error(ureq::Error::StatusCode(503), "t", "ns/foo");
    assert_eq!(err, StoreError::Transport("HTTP status 503".to_string()));
}

#[test]
fn by_id_is_empty_before_any_fetch() {
    assert!(store(ClusterScope::Single).by_id("t", "ns/foo").is_none());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Port 9 (discard) is not served on loopback in test environments
    let store = HttpResourceStore::new(
        "http://127.0.0.1:9",
        ClusterScope::Single,
        Duration::from_secs(2),
    );
    let err = store.find("t", "ns/foo", true).await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)), "got {:?}", err);
    assert!(store.by_id("t", "ns/foo").is_none());
}
