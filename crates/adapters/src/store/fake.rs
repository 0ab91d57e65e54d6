// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake resource store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ResourceStore, StoreError};
use async_trait::async_trait;
use hcitrack_core::ResourceSnapshot;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Find {
        resource_type: String,
        id: String,
        force: bool,
    },
    ById {
        resource_type: String,
        id: String,
    },
}

type Key = (String, String);

#[derive(Default)]
struct FakeStoreState {
    /// What the backend would return to a live fetch
    live: HashMap<Key, ResourceSnapshot>,
    /// What the push channel last delivered
    cache: HashMap<Key, ResourceSnapshot>,
    failures: VecDeque<StoreError>,
    find_delay: Option<Duration>,
}

/// Fake store with a separately controllable backend and push cache.
///
/// `find(force = true)` reads the backend and refreshes the cache;
/// `find(force = false)` prefers the cache; `by_id` only reads the cache.
#[derive(Clone, Default)]
pub struct FakeResourceStore {
    state: Arc<Mutex<FakeStoreState>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl FakeResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(resource_type: &str, id: &str) -> Key {
        (resource_type.to_string(), id.to_string())
    }

    /// Create a resource on the backend and deliver it through the push channel
    pub fn insert(&self, resource_type: &str, id: &str, snapshot: ResourceSnapshot) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .live
            .insert(Self::key(resource_type, id), snapshot.clone());
        state.cache.insert(Self::key(resource_type, id), snapshot);
    }

    /// Change the backend without a push update (disconnected push channel)
    pub fn set_live(&self, resource_type: &str, id: &str, snapshot: ResourceSnapshot) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.live.insert(Self::key(resource_type, id), snapshot);
    }

    /// Deliver a push update, which also reflects the backend
    pub fn push(&self, resource_type: &str, id: &str, snapshot: ResourceSnapshot) {
        self.insert(resource_type, id, snapshot);
    }

    /// Make the next `find` fail with the given error
    pub fn fail_next_find(&self, error: StoreError) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .failures
            .push_back(error);
    }

    /// Delay every `find` (to simulate slow reads)
    pub fn set_find_delay(&self, delay: Duration) {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .find_delay = Some(delay);
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Forced flags of every recorded `find`, in order
    pub fn find_modes(&self) -> Vec<bool> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                StoreCall::Find { force, .. } => Some(force),
                StoreCall::ById { .. } => None,
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
    }
}

#[async_trait]
impl ResourceStore for FakeResourceStore {
    async fn find(
        &self,
        resource_type: &str,
        id: &str,
        force: bool,
    ) -> Result<ResourceSnapshot, StoreError> {
        self.record(StoreCall::Find {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
            force,
        });

        let delay = self
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .find_delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(error) = state.failures.pop_front() {
            return Err(error);
        }

        let key = Self::key(resource_type, id);
        if !force {
            if let Some(snapshot) = state.cache.get(&key) {
                return Ok(snapshot.clone());
            }
        }

        let snapshot = state
            .live
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::not_found(resource_type, id))?;
        state.cache.insert(key, snapshot.clone());
        Ok(snapshot)
    }

    fn by_id(&self, resource_type: &str, id: &str) -> Option<ResourceSnapshot> {
        self.record(StoreCall::ById {
            resource_type: resource_type.to_string(),
            id: id.to_string(),
        });
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .cache
            .get(&Self::key(resource_type, id))
            .cloned()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
