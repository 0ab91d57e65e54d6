// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource store adapters
//!
//! The store holds typed backend resources keyed by (type, id). Reads either
//! go to the network (`find`, optionally forced past the cache) or return
//! whatever copy the store already holds (`by_id`).

mod http;

pub use http::HttpResourceStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeResourceStore, StoreCall};

use async_trait::async_trait;
use hcitrack_core::ResourceSnapshot;
use thiserror::Error;

/// Errors from resource store reads
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("{resource_type} {id} not found")]
    NotFound { resource_type: String, id: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed resource: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn not_found(resource_type: &str, id: &str) -> Self {
        StoreError::NotFound {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Adapter for the host's resource store
#[async_trait]
pub trait ResourceStore: Clone + Send + Sync + 'static {
    /// Fetch a resource. With `force`, bypass any cached or pushed copy.
    async fn find(
        &self,
        resource_type: &str,
        id: &str,
        force: bool,
    ) -> Result<ResourceSnapshot, StoreError>;

    /// The copy currently held by the store, without any I/O
    fn by_id(&self, resource_type: &str, id: &str) -> Option<ResourceSnapshot>;
}
