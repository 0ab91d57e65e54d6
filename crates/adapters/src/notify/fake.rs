// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory notifier for tests
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NotifyAdapter, NotifyError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// One `notify_error` call, delivered or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyCall {
    pub title: String,
    pub message: String,
}

#[derive(Default)]
struct FakeNotifyState {
    calls: Vec<NotifyCall>,
    fail_with: Option<NotifyError>,
}

/// Records error notifications and can be told to reject them
#[derive(Clone, Default)]
pub struct FakeNotifyAdapter {
    inner: Arc<Mutex<FakeNotifyState>>,
}

impl FakeNotifyAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every subsequent notification (the call is still recorded)
    pub fn set_failure(&self, error: NotifyError) {
        self.state().fail_with = Some(error);
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.state().calls.clone()
    }

    /// Messages of the calls made with `title`
    pub fn messages_for(&self, title: &str) -> Vec<String> {
        self.state()
            .calls
            .iter()
            .filter(|c| c.title == title)
            .map(|c| c.message.clone())
            .collect()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeNotifyState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl NotifyAdapter for FakeNotifyAdapter {
    async fn notify_error(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let mut state = self.state();
        state.calls.push(NotifyCall {
            title: title.to_string(),
            message: message.to_string(),
        });
        match &state.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
