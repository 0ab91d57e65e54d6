// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker factory for CLI commands

use crate::notify::StderrNotifier;
use hcitrack_adapters::{
    HttpDownloader, HttpResourceStore, TracedDownloadAdapter, TracedResourceStore,
};
use hcitrack_core::{
    ClusterScope, HarvesterUrlBuilder, OperationKind, SystemClock, TrackerConfig, UuidIdGen,
};
use hcitrack_engine::{Tracker, TrackerDeps, TrackerHandle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Per-request timeout for resource reads
const READ_TIMEOUT: Duration = Duration::from_secs(30);
/// Artifacts can be large
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Production tracker with HTTP adapters
pub type CliTracker = TrackerHandle<
    TracedResourceStore<HttpResourceStore>,
    StderrNotifier,
    TracedDownloadAdapter<HttpDownloader>,
    SystemClock,
    UuidIdGen,
>;

/// Where and how to reach the backend
pub struct Target {
    pub server: String,
    pub scope: ClusterScope,
    pub output_dir: PathBuf,
}

/// Create a production tracker for one operation kind
pub fn make_tracker(kind: OperationKind, target: Target, config: TrackerConfig) -> CliTracker {
    let store = HttpResourceStore::new(&target.server, target.scope.clone(), READ_TIMEOUT);
    let downloader = HttpDownloader::new(target.output_dir, DOWNLOAD_TIMEOUT);
    let urls = HarvesterUrlBuilder::new(&target.server, target.scope);

    Tracker::new(
        kind,
        TrackerDeps {
            store: TracedResourceStore::new(store),
            notify: StderrNotifier,
            downloader: TracedDownloadAdapter::new(downloader),
        },
        Arc::new(urls),
        config,
        SystemClock,
        UuidIdGen,
    )
    .into_handle()
}
