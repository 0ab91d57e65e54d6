// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the tracker's external collaborators: the resource store,
//! the notifier and the download side effect

pub mod download;
pub mod notify;
pub mod store;
pub mod traced;

pub use download::{DownloadAdapter, DownloadError, HttpDownloader, NoOpDownloadAdapter};
pub use notify::{NoOpNotifyAdapter, NotifyAdapter, NotifyError};
pub use store::{HttpResourceStore, ResourceStore, StoreError};
pub use traced::{TracedDownloadAdapter, TracedResourceStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use download::{DownloadCall, FakeDownloadAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyAdapter, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeResourceStore, StoreCall};
