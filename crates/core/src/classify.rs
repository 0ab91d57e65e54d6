// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status classification for polled resources
//!
//! Each operation kind reports readiness, progress and failure through
//! different fields of its backend resource. A [`StatusClassifier`] maps a
//! resource snapshot to a [`Classification`]; the [`ClassifierRegistry`]
//! holds one classifier per [`OperationKind`] so new kinds plug in without
//! touching the tracker.

use crate::operation::OperationKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A point-in-time copy of a backend resource as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceSnapshot(pub Value);

impl ResourceSnapshot {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// String at a JSON pointer (e.g. `/status/state`)
    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }

    /// Number at a JSON pointer; numeric strings are accepted too
    pub fn number_at(&self, pointer: &str) -> Option<f64> {
        match self.0.pointer(pointer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Message of the first `status.conditions` entry accepted by `pred`
    pub fn condition_message(&self, pred: impl Fn(&Value) -> bool) -> Option<&str> {
        self.0
            .pointer("/status/conditions")?
            .as_array()?
            .iter()
            .filter(|c| pred(c))
            .find_map(|c| c.get("message").and_then(Value::as_str))
            .filter(|m| !m.is_empty())
    }
}

/// What a resource snapshot says about its operation
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// Still running; progress is a fraction when the resource reports one
    Pending { progress: Option<f64> },
    Ready,
    Failed { message: String },
}

/// Maps a resource snapshot of one operation kind to a classification
pub trait StatusClassifier: Send + Sync {
    fn classify(&self, snapshot: &ResourceSnapshot) -> Classification;
}

/// Percent field (0..100) as a fraction
fn percent_fraction(snapshot: &ResourceSnapshot, pointer: &str) -> Option<f64> {
    snapshot
        .number_at(pointer)
        .filter(|p| p.is_finite())
        .map(|p| (p / 100.0).clamp(0.0, 1.0))
}

fn error_message(snapshot: &ResourceSnapshot) -> Option<&str> {
    snapshot
        .str_at("/status/errorMessage")
        .filter(|m| !m.trim().is_empty())
}

/// Support bundles: `status.state == "ready"` once the archive exists.
///
/// Failures surface either as `status.errorMessage` or as a false
/// `Initialized` condition.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleClassifier;

impl StatusClassifier for BundleClassifier {
    fn classify(&self, snapshot: &ResourceSnapshot) -> Classification {
        if snapshot.str_at("/status/state") == Some("ready") {
            return Classification::Ready;
        }

        let failed = error_message(snapshot).or_else(|| {
            snapshot.condition_message(|c| {
                c.get("type").and_then(Value::as_str) == Some("Initialized")
                    && c.get("status").and_then(Value::as_str) == Some("False")
            })
        });
        if let Some(message) = failed {
            return Classification::Failed {
                message: message.to_string(),
            };
        }

        Classification::Pending {
            progress: percent_fraction(snapshot, "/status/progress"),
        }
    }
}

/// Image downloaders: `status.status == "Ready"` once the export is prepared
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDownloadClassifier;

impl StatusClassifier for ImageDownloadClassifier {
    fn classify(&self, snapshot: &ResourceSnapshot) -> Classification {
        if snapshot.str_at("/status/status") == Some("Ready") {
            return Classification::Ready;
        }

        let failed = error_message(snapshot).or_else(|| {
            snapshot.condition_message(|c| c.get("reason").and_then(Value::as_str) == Some("Failed"))
        });
        if let Some(message) = failed {
            return Classification::Failed {
                message: message.to_string(),
            };
        }

        Classification::Pending {
            progress: percent_fraction(snapshot, "/status/progress"),
        }
    }
}

/// Classifier table keyed by operation kind
#[derive(Clone)]
pub struct ClassifierRegistry {
    classifiers: HashMap<OperationKind, Arc<dyn StatusClassifier>>,
}

impl ClassifierRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            classifiers: HashMap::new(),
        }
    }

    /// Registry with the built-in classifiers for every kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(OperationKind::Bundle, BundleClassifier);
        registry.register(OperationKind::ImageDownload, ImageDownloadClassifier);
        registry
    }

    /// Install (or replace) the classifier for a kind
    pub fn register(&mut self, kind: OperationKind, classifier: impl StatusClassifier + 'static) {
        self.classifiers.insert(kind, Arc::new(classifier));
    }

    pub fn get(&self, kind: OperationKind) -> Option<Arc<dyn StatusClassifier>> {
        self.classifiers.get(&kind).cloned()
    }
}

impl Default for ClassifierRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for ClassifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.classifiers.keys()).finish()
    }
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
