// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for operation orchestration

use crate::id::ResourceId;
use crate::operation::OperationKind;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Side effects the operation state machine asks the tracker to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Publish an event to observers
    Emit(Event),
    /// Arm the repeating poll tick
    ArmPolling { interval: Duration },
    /// Tear down the poll tick (idempotent)
    StopPolling,
    /// Read the tracked resource, bypassing the cache when `force` is set
    Read { force: bool },
    /// Surface a user-visible error
    Notify { title: String, message: String },
    /// Arm the one-shot completion timer
    ScheduleCompletion { delay: Duration },
    /// Run the completion side effect for a ready operation
    Download { kind: OperationKind, id: ResourceId },
}

/// Why an operation ended in `Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The polled resource reported an error
    Backend,
    /// Reads kept failing at the transport level
    Unreachable,
    /// The tick ceiling was exceeded
    Timeout,
    /// The resource became ready but fetching the artifact failed
    Download,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Backend => "backend failure",
            FailureKind::Unreachable => "resource unreachable",
            FailureKind::Timeout => "timed out",
            FailureKind::Download => "download failed",
        };
        f.write_str(s)
    }
}

/// How the previous run of an operation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Failed { kind: FailureKind, message: String },
    Cancelled,
}

/// Events published to observers (progress dialogs, the CLI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Started {
        kind: OperationKind,
        id: ResourceId,
        run_id: String,
    },
    Progress {
        kind: OperationKind,
        id: ResourceId,
        progress: f64,
    },
    Ready {
        kind: OperationKind,
        id: ResourceId,
    },
    Completed {
        kind: OperationKind,
        id: ResourceId,
    },
    Failed {
        kind: OperationKind,
        id: ResourceId,
        failure: FailureKind,
        message: String,
    },
    Cancelled {
        kind: OperationKind,
        id: ResourceId,
    },
    /// The progress dialog for this kind should close
    DialogClosed { kind: OperationKind },
}

impl Event {
    /// Event name in "category:action" form, used as a log field
    pub fn name(&self) -> &'static str {
        match self {
            Event::Started { .. } => "operation:started",
            Event::Progress { .. } => "operation:progress",
            Event::Ready { .. } => "operation:ready",
            Event::Completed { .. } => "operation:completed",
            Event::Failed { .. } => "operation:failed",
            Event::Cancelled { .. } => "operation:cancelled",
            Event::DialogClosed { .. } => "dialog:closed",
        }
    }

    /// True for events that end a run
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::Completed { .. } | Event::Failed { .. } | Event::Cancelled { .. }
        )
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
