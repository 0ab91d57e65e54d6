// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hcitrack-core: pure building blocks for tracking long-running backend operations
//!
//! This crate provides:
//! - The `Operation` state machine (one per operation kind)
//! - Effects and events requested by the state machine
//! - Per-kind status classifiers and download URL builders
//! - Tracker configuration, clock and id abstractions

pub mod classify;
pub mod clock;
pub mod config;
pub mod effect;
pub mod id;
pub mod operation;
pub mod upload;
pub mod url;

// Re-exports
pub use classify::{
    BundleClassifier, Classification, ClassifierRegistry, ImageDownloadClassifier,
    ResourceSnapshot, StatusClassifier,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, TrackerConfig};
pub use effect::{Effect, Event, FailureKind, Outcome};
pub use id::{IdGen, ResourceId, ResourceIdError, SequentialIdGen, UuidIdGen};
pub use operation::{Operation, OperationInput, OperationKind, OperationStatus, ReadMode};
pub use upload::UploadRegistry;
pub use url::{ClusterScope, DownloadUrlBuilder, HarvesterUrlBuilder};
