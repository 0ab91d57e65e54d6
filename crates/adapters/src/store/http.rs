// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource store backed by the harvester REST API

use super::{ResourceStore, StoreError};
use async_trait::async_trait;
use hcitrack_core::{ClusterScope, ResourceSnapshot};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type CacheKey = (String, String);

/// HTTP store that caches the last body read for each resource.
///
/// There is no push channel here, so cached reads return the value from the
/// last network fetch until a forced read refreshes it.
#[derive(Clone)]
pub struct HttpResourceStore {
    agent: ureq::Agent,
    origin: String,
    scope: ClusterScope,
    cache: Arc<Mutex<HashMap<CacheKey, ResourceSnapshot>>>,
}

impl HttpResourceStore {
    pub fn new(origin: impl Into<String>, scope: ClusterScope, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        let origin = origin.into();
        Self {
            agent: config.into(),
            origin: origin.trim_end_matches('/').to_string(),
            scope,
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Collection URL is the pluralised resource type
    pub(crate) fn resource_url(&self, resource_type: &str, id: &str) -> String {
        format!(
            "{}{}/v1/harvester/{}s/{}",
            self.origin,
            self.scope.prefix(),
            resource_type,
            id
        )
    }

    fn cached(&self, resource_type: &str, id: &str) -> Option<ResourceSnapshot> {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(resource_type.to_string(), id.to_string()))
            .cloned()
    }

    async fn fetch(&self, resource_type: &str, id: &str) -> Result<ResourceSnapshot, StoreError> {
        let url = self.resource_url(resource_type, id);
        let agent = self.agent.clone();
        let (rt, rid) = (resource_type.to_string(), id.to_string());

        let body = tokio::task::spawn_blocking(move || {
            let mut response = agent
                .get(&url)
                .header("Accept", "application/json")
                .call()
                .map_err(|e| map_http_error(e, &rt, &rid))?;
            response
                .body_mut()
                .read_to_string()
                .map_err(|e| StoreError::Transport(format!("failed to read response: {}", e)))
        })
        .await
        .map_err(|e| StoreError::Transport(format!("read task failed: {}", e)))??;

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        let snapshot = ResourceSnapshot::new(value);

        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((resource_type.to_string(), id.to_string()), snapshot.clone());
        Ok(snapshot)
    }
}

pub(crate) fn map_http_error(err: ureq::Error, resource_type: &str, id: &str) -> StoreError {
    match err {
        ureq::Error::StatusCode(404) => StoreError::not_found(resource_type, id),
        ureq::Error::StatusCode(code) => StoreError::Transport(format!("HTTP status {}", code)),
        other => StoreError::Transport(other.to_string()),
    }
}

#[async_trait]
impl ResourceStore for HttpResourceStore {
    async fn find(
        &self,
        resource_type: &str,
        id: &str,
        force: bool,
    ) -> Result<ResourceSnapshot, StoreError> {
        if !force {
            if let Some(snapshot) = self.cached(resource_type, id) {
                return Ok(snapshot);
            }
        }
        self.fetch(resource_type, id).await
    }

    fn by_id(&self, resource_type: &str, id: &str) -> Option<ResourceSnapshot> {
        self.cached(resource_type, id)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
