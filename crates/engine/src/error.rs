// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the tracker

use hcitrack_adapters::StoreError;
use hcitrack_core::{OperationKind, ResourceId};
use thiserror::Error;

/// Errors reported synchronously by the tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("{kind} {id} does not reference a known resource")]
    InvalidReference { kind: OperationKind, id: ResourceId },
    #[error("a {0} operation is already in progress")]
    AlreadyInProgress(OperationKind),
    #[error("no status classifier registered for {0}")]
    NoClassifier(OperationKind),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
