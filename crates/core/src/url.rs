// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Download URL construction
//!
//! Completion side effects navigate to
//! `{origin}[/k8s/clusters/{cluster}]/v1/harvester/{collection}/{key}/download`.
//! The cluster segment only exists when the console is reached through a
//! multi-cluster proxy.

use crate::id::ResourceId;
use crate::operation::OperationKind;

/// Cluster identity of the deployment the tracker talks to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClusterScope {
    /// Talking to the cluster directly
    #[default]
    Single,
    /// Reached through a multi-cluster proxy
    Multi { cluster_id: String },
}

impl ClusterScope {
    pub fn multi(cluster_id: impl Into<String>) -> Self {
        ClusterScope::Multi {
            cluster_id: cluster_id.into(),
        }
    }

    /// Path prefix for cluster-scoped URLs (empty for single clusters)
    pub fn prefix(&self) -> String {
        match self {
            ClusterScope::Single => String::new(),
            ClusterScope::Multi { cluster_id } => format!("/k8s/clusters/{}", cluster_id),
        }
    }

    /// Scope a relative API path to this cluster
    pub fn scoped_path(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        match self {
            ClusterScope::Single => path.to_string(),
            ClusterScope::Multi { .. } => format!("{}/{}", self.prefix(), path),
        }
    }
}

/// Builds the URL the completion side effect navigates to
pub trait DownloadUrlBuilder: Send + Sync {
    fn build(&self, kind: OperationKind, id: &ResourceId) -> String;
}

/// URL layout of the harvester API
#[derive(Debug, Clone)]
pub struct HarvesterUrlBuilder {
    origin: String,
    scope: ClusterScope,
}

impl HarvesterUrlBuilder {
    pub fn new(origin: impl Into<String>, scope: ClusterScope) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            scope,
        }
    }

    pub fn scope(&self) -> &ClusterScope {
        &self.scope
    }
}

impl DownloadUrlBuilder for HarvesterUrlBuilder {
    fn build(&self, kind: OperationKind, id: &ResourceId) -> String {
        // Bundles are addressed by name only; images by namespace/name
        let (collection, key) = match kind {
            OperationKind::Bundle => ("supportbundles", id.name().to_string()),
            OperationKind::ImageDownload => ("harvesterhci.io.virtualmachineimage", id.to_string()),
        };
        format!(
            "{}{}/v1/harvester/{}/{}/download",
            self.origin,
            self.scope.prefix(),
            collection,
            key
        )
    }
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
