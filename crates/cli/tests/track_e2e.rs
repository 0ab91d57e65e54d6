// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end tracking against a local HTTP server

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

mod common;

use assert_cmd::Command;
use common::{FakeServer, FAST_CONFIG};
use predicates::prelude::*;
use tempfile::TempDir;

const BUNDLE_PATH: &str = "/v1/harvester/harvesterhci.io.supportbundles/ns/foo";
const BUNDLE_DOWNLOAD: &str = "/v1/harvester/supportbundles/foo/download";

fn workdir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tracker.toml"), FAST_CONFIG).unwrap();
    dir
}

fn hcitrack(dir: &TempDir, server: &FakeServer) -> Command {
    let mut cmd = Command::cargo_bin("hcitrack").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["--server", server.origin()])
        .args(["--config", "tracker.toml", "--output", "."]);
    cmd
}

#[test]
fn ready_bundle_is_downloaded() {
    let server = FakeServer::start(vec![
        (
            BUNDLE_PATH.to_string(),
            r#"{"status":{"state":"ready","progress":100}}"#.to_string(),
        ),
        (BUNDLE_DOWNLOAD.to_string(), "bundle-bytes".to_string()),
    ]);
    let dir = workdir();

    hcitrack(&dir, &server)
        .args(["bundle", "ns/foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Support bundle ns/foo: ready"))
        .stdout(predicate::str::contains("Support bundle ns/foo: completed"));

    let body = std::fs::read_to_string(dir.path().join("ns_foo.zip")).unwrap();
    assert_eq!(body, "bundle-bytes");
    assert!(server.requests().iter().any(|p| p == BUNDLE_DOWNLOAD));
}

#[test]
fn failed_artifact_download_exits_nonzero() {
    // Resource is ready but the download endpoint is missing
    let server = FakeServer::start(vec![(
        BUNDLE_PATH.to_string(),
        r#"{"status":{"state":"ready"}}"#.to_string(),
    )]);
    let dir = workdir();

    hcitrack(&dir, &server)
        .args(["bundle", "ns/foo"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Support bundle ns/foo: failed"))
        .stdout(predicate::str::contains("completed").not())
        .stderr(predicate::str::contains("Support bundle failed: download failed"))
        // Warn-level log lines go to a pipe here, so no colour codes
        .stderr(predicate::str::contains("artifact download failed"))
        .stderr(predicate::str::contains("\u{1b}[").not());

    assert!(server.requests().iter().any(|p| p == BUNDLE_DOWNLOAD));
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .filter(|name| name != "tracker.toml")
        .collect();
    assert!(leftovers.is_empty(), "left {:?}", leftovers);
}

#[test]
fn backend_error_exits_nonzero_without_download() {
    let server = FakeServer::start(vec![(
        BUNDLE_PATH.to_string(),
        r#"{"status":{"progress":20,"errorMessage":"node unreachable"}}"#.to_string(),
    )]);
    let dir = workdir();

    hcitrack(&dir, &server)
        .args(["bundle", "ns/foo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Support bundle failed: node unreachable"));

    assert!(!dir.path().join("ns_foo.zip").exists());
    assert!(!server.requests().iter().any(|p| p == BUNDLE_DOWNLOAD));
}

#[test]
fn unknown_resource_is_reported_as_not_found() {
    let server = FakeServer::start(vec![]);
    let dir = workdir();

    hcitrack(&dir, &server)
        .args(["image", "ns/missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("image_download ns/missing not found"));
}

#[test]
fn multi_cluster_requests_use_cluster_prefix() {
    let prefix = "/k8s/clusters/c-1";
    let server = FakeServer::start(vec![
        (
            format!("{}{}", prefix, BUNDLE_PATH),
            r#"{"status":{"state":"ready"}}"#.to_string(),
        ),
        (format!("{}{}", prefix, BUNDLE_DOWNLOAD), "zip".to_string()),
    ]);
    let dir = workdir();

    hcitrack(&dir, &server)
        .args(["--cluster", "c-1", "--format", "json", "bundle", "ns/foo"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"completed""#));

    assert!(dir.path().join("ns_foo.zip").exists());
}
