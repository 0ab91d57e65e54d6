// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hcitrack bundle|image <namespace/name>` - Track an operation to completion

use crate::adapters::{make_tracker, Target};
use crate::error::CliError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use hcitrack_core::{ClusterScope, OperationKind, Outcome, ResourceId, TrackerConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(Args)]
pub struct TrackArgs {
    /// Resource to track, as <namespace>/<name>
    pub id: String,
}

/// Settings shared by every tracking command
pub struct TrackOptions {
    pub server: Option<String>,
    pub cluster: Option<String>,
    pub config: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
}

/// Track one operation until it completes, fails or is cancelled
pub async fn track(kind: OperationKind, args: TrackArgs, options: TrackOptions) -> Result<Outcome> {
    let id: ResourceId = args
        .id
        .parse()
        .map_err(|e| CliError::invalid_id(&args.id, e))?;

    let config = match &options.config {
        Some(path) => TrackerConfig::load(path).map_err(|e| CliError::config(path, e))?,
        None => TrackerConfig::default(),
    };

    let server = options.server.ok_or_else(CliError::missing_server)?;
    let scope = match options.cluster {
        Some(cluster_id) => ClusterScope::multi(cluster_id),
        None => ClusterScope::Single,
    };

    let tracker = make_tracker(
        kind,
        Target {
            server,
            scope,
            output_dir: options.output_dir,
        },
        config,
    );
    let mut events = tracker.subscribe();

    {
        let tracker = Arc::clone(&tracker);
        ctrlc::set_handler(move || tracker.cancel())?;
    }

    tracker.start(id).await.map_err(CliError::start)?;

    let wait = tracker.wait();
    tokio::pin!(wait);
    loop {
        tokio::select! {
            _ = &mut wait => break,
            event = events.recv() => match event {
                Ok(event) => output::print(&event, options.format),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "output fell behind, events dropped");
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    while let Ok(event) = events.try_recv() {
        output::print(&event, options.format);
    }

    let outcome = tracker
        .operation()
        .await
        .last_outcome
        .unwrap_or(Outcome::Cancelled);
    Ok(outcome)
}
