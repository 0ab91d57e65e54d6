// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifact download adapters

mod http;

pub use http::HttpDownloader;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DownloadCall, FakeDownloadAdapter};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from download operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("write failed: {0}")]
    Write(String),
}

/// Adapter for fetching a finished artifact
#[async_trait]
pub trait DownloadAdapter: Clone + Send + Sync + 'static {
    /// Fetch `url` and store it under `file_name`
    async fn download(&self, url: &str, file_name: &str) -> Result<(), DownloadError>;
}

/// Downloader that accepts every request and does nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpDownloadAdapter;

impl NoOpDownloadAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DownloadAdapter for NoOpDownloadAdapter {
    async fn download(&self, _url: &str, _file_name: &str) -> Result<(), DownloadError> {
        Ok(())
    }
}
