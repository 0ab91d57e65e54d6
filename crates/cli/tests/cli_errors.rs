// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI argument and startup error handling

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn hcitrack() -> Command {
    Command::cargo_bin("hcitrack").unwrap()
}

#[test]
fn help_lists_tracking_commands() {
    hcitrack()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle"))
        .stdout(predicate::str::contains("image"))
        .stdout(predicate::str::contains("--server"));
}

#[test]
fn missing_resource_argument_is_a_usage_error() {
    hcitrack()
        .arg("bundle")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("<ID>"));
}

#[test]
fn malformed_resource_reference_is_rejected() {
    hcitrack()
        .args(["--server", "http://127.0.0.1:9", "bundle", "no-slash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'no-slash' is not a resource reference"))
        .stderr(predicate::str::contains("<namespace>/<name>"));
}

#[test]
fn missing_server_is_reported_with_suggestion() {
    hcitrack()
        .args(["image", "ns/img"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no server given"))
        .stderr(predicate::str::contains("--server"));
}

#[test]
fn invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tracker.toml");
    std::fs::write(&config, "tick_interval = \"soon\"\n").unwrap();

    hcitrack()
        .args(["--server", "http://127.0.0.1:9", "--config"])
        .arg(&config)
        .args(["bundle", "ns/foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot use config file"));
}

#[test]
fn unreachable_server_fails_before_tracking() {
    hcitrack()
        .args(["--server", "http://127.0.0.1:9", "bundle", "ns/foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot reach the server"));
}

#[test]
fn completions_are_generated() {
    hcitrack()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hcitrack"));
}
