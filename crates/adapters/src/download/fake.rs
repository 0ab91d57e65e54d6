// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake downloader for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DownloadAdapter, DownloadError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recorded download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadCall {
    pub url: String,
    pub file_name: String,
}

#[derive(Default)]
struct FakeDownloadState {
    calls: Vec<DownloadCall>,
    fail_with: Option<DownloadError>,
}

/// Fake downloader that records requests
#[derive(Clone, Default)]
pub struct FakeDownloadAdapter {
    inner: Arc<Mutex<FakeDownloadState>>,
}

impl FakeDownloadAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent download fail
    pub fn set_failure(&self, error: DownloadError) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fail_with = Some(error);
    }

    /// Get all recorded downloads
    pub fn calls(&self) -> Vec<DownloadCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl DownloadAdapter for FakeDownloadAdapter {
    async fn download(&self, url: &str, file_name: &str) -> Result<(), DownloadError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.calls.push(DownloadCall {
            url: url.to_string(),
            file_name: file_name.to_string(),
        });
        match &inner.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
