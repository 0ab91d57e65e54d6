// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::download::{DownloadAdapter, DownloadError};
use crate::store::{ResourceStore, StoreError};
use async_trait::async_trait;
use hcitrack_core::ResourceSnapshot;
use tracing::Instrument;

/// Wrapper that adds tracing to any ResourceStore
#[derive(Clone)]
pub struct TracedResourceStore<S> {
    inner: S,
}

impl<S> TracedResourceStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ResourceStore> ResourceStore for TracedResourceStore<S> {
    async fn find(
        &self,
        resource_type: &str,
        id: &str,
        force: bool,
    ) -> Result<ResourceSnapshot, StoreError> {
        let span = tracing::debug_span!("store.find", resource_type, id, force);

        async {
            let start = std::time::Instant::now();
            let result = self.inner.find(resource_type, id, force).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(_) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "read"),
                // Absence is reported to the caller, not an adapter fault
                Err(e) if e.is_not_found() => tracing::debug!("not found"),
                Err(e) => tracing::warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "read failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    fn by_id(&self, resource_type: &str, id: &str) -> Option<ResourceSnapshot> {
        let result = self.inner.by_id(resource_type, id);
        tracing::trace!(resource_type, id, hit = result.is_some(), "cache lookup");
        result
    }
}

/// Wrapper that adds tracing to any DownloadAdapter
#[derive(Clone)]
pub struct TracedDownloadAdapter<D> {
    inner: D,
}

impl<D> TracedDownloadAdapter<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<D: DownloadAdapter> DownloadAdapter for TracedDownloadAdapter<D> {
    async fn download(&self, url: &str, file_name: &str) -> Result<(), DownloadError> {
        let span = tracing::info_span!("download", url, file_name);

        async {
            tracing::info!("starting");

            // Precondition: a download needs a source
            if url.trim().is_empty() {
                tracing::error!("empty download url");
                return Err(DownloadError::Request("empty download url".to_string()));
            }

            let start = std::time::Instant::now();
            let result = self.inner.download(url, file_name).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "downloaded"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "download failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
