// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of image uploads in flight
//!
//! Uploads are not polled; the uploader reports start, error and end. An
//! error stays attached to the image name after the upload ends so the
//! console can show it next to the image.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Uploads {
    in_flight: Vec<String>,
    errors: HashMap<String, String>,
}

/// Shared, cloneable upload registry
#[derive(Debug, Clone, Default)]
pub struct UploadRegistry {
    inner: Arc<Mutex<Uploads>>,
}

impl UploadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an upload started; a previous error for the name is cleared
    pub fn upload_start(&self, name: impl Into<String>) {
        let name = name.into();
        let mut uploads = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        uploads.errors.remove(&name);
        if !uploads.in_flight.contains(&name) {
            uploads.in_flight.push(name);
        }
    }

    pub fn upload_error(&self, name: impl Into<String>, message: impl Into<String>) {
        let mut uploads = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        uploads.errors.insert(name.into(), message.into());
    }

    pub fn upload_end(&self, name: &str) {
        let mut uploads = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        uploads.in_flight.retain(|n| n != name);
    }

    /// Names of uploads in flight, in start order
    pub fn uploading(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .in_flight
            .clone()
    }

    pub fn is_uploading(&self, name: &str) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .in_flight
            .iter()
            .any(|n| n == name)
    }

    pub fn error_for(&self, name: &str) -> Option<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .errors
            .get(name)
            .cloned()
    }
}
