// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal notifier

use async_trait::async_trait;
use hcitrack_adapters::{NotifyAdapter, NotifyError};

/// Prints error notifications to stderr
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrNotifier;

#[async_trait]
impl NotifyAdapter for StderrNotifier {
    async fn notify_error(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        eprintln!("{}: {}", title, message);
        Ok(())
    }
}
