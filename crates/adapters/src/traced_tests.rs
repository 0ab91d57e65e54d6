// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::download::{DownloadCall, FakeDownloadAdapter};
use crate::store::{FakeResourceStore, StoreCall};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

const BUNDLE: &str = "harvesterhci.io.supportbundle";

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn bundle_store() -> FakeResourceStore {
    let store = FakeResourceStore::new();
    store.insert(
        BUNDLE,
        "ns/foo",
        ResourceSnapshot::new(json!({ "status": { "progress": 40 } })),
    );
    store
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_download_rejects_empty_url() {
    let fake = FakeDownloadAdapter::new();
    let traced = TracedDownloadAdapter::new(fake.clone());

    let err = traced.download("  ", "out.zip").await.unwrap_err();

    assert!(
        err.to_string().contains("empty download url"),
        "Expected error about the url, got: {}",
        err
    );
    assert!(fake.calls().is_empty(), "inner adapter must not be called");
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_store_find_logs_span_and_timing() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedResourceStore::new(bundle_store());
        traced.find(BUNDLE, "ns/foo", true).await
    });

    assert!(result.is_ok(), "find should succeed: {:?}", result);
    assert!(logs.contains("store.find"), "Should log span name. Logs:\n{}", logs);
    assert!(logs.contains("ns/foo"), "Should log resource id. Logs:\n{}", logs);
    assert!(logs.contains("elapsed_ms"), "Should log timing. Logs:\n{}", logs);
}

#[test]
fn traced_store_logs_read_failure_as_warning() {
    let (logs, result) = with_tracing(|| async {
        let store = bundle_store();
        store.fail_next_find(StoreError::Transport("connection reset".to_string()));
        TracedResourceStore::new(store)
            .find(BUNDLE, "ns/foo", true)
            .await
    });

    assert!(result.is_err());
    assert!(logs.contains("WARN"), "Should warn. Logs:\n{}", logs);
    assert!(
        logs.contains("connection reset"),
        "Should log the error. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_store_does_not_warn_on_not_found() {
    let (logs, result) = with_tracing(|| async {
        TracedResourceStore::new(FakeResourceStore::new())
            .find(BUNDLE, "ns/missing", false)
            .await
    });

    assert!(result.unwrap_err().is_not_found());
    assert!(!logs.contains("WARN"), "Should not warn. Logs:\n{}", logs);
}

#[test]
fn traced_download_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        TracedDownloadAdapter::new(FakeDownloadAdapter::new())
            .download("http://h/download", "ns-foo.zip")
            .await
    });

    assert!(result.is_ok());
    assert!(logs.contains("starting"), "Should log entry. Logs:\n{}", logs);
    assert!(logs.contains("downloaded"), "Should log completion. Logs:\n{}", logs);
    assert!(logs.contains("ns-foo.zip"), "Should log file name. Logs:\n{}", logs);
}

#[test]
fn traced_download_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeDownloadAdapter::new();
        fake.set_failure(DownloadError::Request("HTTP status 500".to_string()));
        TracedDownloadAdapter::new(fake)
            .download("http://h/download", "ns-foo.zip")
            .await
    });

    assert!(result.is_err());
    assert!(logs.contains("download failed"), "Logs:\n{}", logs);
}

// =============================================================================
// Delegation tests - verify traced wrapper delegates to inner adapter
// =============================================================================

#[tokio::test]
async fn traced_store_delegates_to_inner() {
    let fake = bundle_store();
    let traced = TracedResourceStore::new(fake.clone());

    let _ = traced.find(BUNDLE, "ns/foo", true).await.unwrap();
    assert!(traced.by_id(BUNDLE, "ns/foo").is_some());

    assert_eq!(
        fake.calls(),
        vec![
            StoreCall::Find {
                resource_type: BUNDLE.to_string(),
                id: "ns/foo".to_string(),
                force: true,
            },
            StoreCall::ById {
                resource_type: BUNDLE.to_string(),
                id: "ns/foo".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn traced_download_delegates_to_inner() {
    let fake = FakeDownloadAdapter::new();
    let traced = TracedDownloadAdapter::new(fake.clone());

    traced.download("http://h/download", "a.zip").await.unwrap();

    assert_eq!(
        fake.calls(),
        vec![DownloadCall {
            url: "http://h/download".to_string(),
            file_name: "a.zip".to_string(),
        }]
    );
}
