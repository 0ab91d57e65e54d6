// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation state machine
//!
//! An operation is one long-running backend job (a support bundle being
//! generated, an image being prepared for download) whose progress is only
//! observable by polling its resource. There is one `Operation` record per
//! [`OperationKind`]; it cycles `Idle -> Pending -> {Ready, Failed,
//! Cancelled} -> Idle`.
//!
//! `transition` is pure: it returns the next record and the effects the
//! tracker must perform. Reads, timers, notifications and downloads all
//! happen outside this module.

use crate::classify::Classification;
use crate::clock::Clock;
use crate::config::TrackerConfig;
use crate::effect::{Effect, Event, FailureKind, Outcome};
use crate::id::ResourceId;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Which backend job an operation tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Bundle,
    ImageDownload,
}

impl OperationKind {
    pub const ALL: [OperationKind; 2] = [OperationKind::Bundle, OperationKind::ImageDownload];

    /// Resource type polled in the store
    pub fn resource_type(&self) -> &'static str {
        match self {
            OperationKind::Bundle => "harvesterhci.io.supportbundle",
            OperationKind::ImageDownload => "harvesterhci.io.virtualmachineimagedownloader",
        }
    }

    /// Human-readable name, used in notifications
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::Bundle => "Support bundle",
            OperationKind::ImageDownload => "Image download",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Bundle => f.write_str("bundle"),
            OperationKind::ImageDownload => f.write_str("image_download"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Idle,
    Pending,
    Ready,
    Failed,
    Cancelled,
}

/// How a tick reads the resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Last value held by the store (kept fresh by the push channel)
    Cached,
    /// Live fetch that bypasses the cache
    Forced,
}

impl ReadMode {
    /// Every `force_every`-th tick forces a fresh read, so a silently
    /// disconnected push channel can leave the cache stale for at most
    /// `force_every` ticks.
    pub fn for_tick(poll_count: u64, force_every: u64) -> Self {
        if force_every > 0 && poll_count % force_every == 0 {
            ReadMode::Forced
        } else {
            ReadMode::Cached
        }
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, ReadMode::Forced)
    }
}

/// Inputs that drive an operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationInput {
    /// The user triggered the backend job
    Start { id: ResourceId, run_id: String },
    /// Poll tick; carries the cancel flag as observed at the tick boundary
    Tick { cancel_requested: bool },
    /// The classified result of this tick's read
    Observed(Classification),
    /// This tick's read failed at the transport level
    ReadFailed { error: String },
    /// The deferred completion timer fired
    CompletionDue,
    /// The completion download finished; `error` is set when it failed
    Downloaded { error: Option<String> },
    /// Terminal bookkeeping is done; return to idle
    Reset,
}

/// The tracked state of one operation kind
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: OperationKind,
    pub id: Option<ResourceId>,
    pub run_id: Option<String>,
    pub status: OperationStatus,
    /// Fraction in [0, 1]; only meaningful while pending
    pub progress: f64,
    pub poll_count: u64,
    pub cancel_requested: bool,
    /// Set only while `status` is `Failed`
    pub last_error: Option<String>,
    pub failure: Option<FailureKind>,
    pub consecutive_read_failures: u32,
    /// The completion download has been handed to the downloader
    pub downloading: bool,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub last_outcome: Option<Outcome>,
    pub config: TrackerConfig,
}

impl Operation {
    /// Create an idle operation record
    pub fn new(kind: OperationKind, config: TrackerConfig) -> Self {
        Operation {
            kind,
            id: None,
            run_id: None,
            status: OperationStatus::Idle,
            progress: 0.0,
            poll_count: 0,
            cancel_requested: false,
            last_error: None,
            failure: None,
            consecutive_read_failures: 0,
            downloading: false,
            started_at: None,
            finished_at: None,
            last_outcome: None,
            config,
        }
    }

    /// Pure transition function - returns new state and effects
    pub fn transition(&self, input: OperationInput, clock: &impl Clock) -> (Operation, Vec<Effect>) {
        let now = clock.now();

        match (self.status, input) {
            // Idle → Pending
            (OperationStatus::Idle, OperationInput::Start { id, run_id }) => {
                let op = Operation {
                    id: Some(id.clone()),
                    run_id: Some(run_id.clone()),
                    status: OperationStatus::Pending,
                    progress: 0.0,
                    poll_count: 0,
                    cancel_requested: false,
                    last_error: None,
                    failure: None,
                    consecutive_read_failures: 0,
                    downloading: false,
                    started_at: Some(now),
                    finished_at: None,
                    ..self.clone()
                };
                let effects = vec![
                    Effect::Emit(Event::Started {
                        kind: self.kind,
                        id,
                        run_id,
                    }),
                    Effect::ArmPolling {
                        interval: self.config.tick_interval,
                    },
                ];
                (op, effects)
            }

            // Pending: a cancel observed at the tick boundary wins over reading
            (OperationStatus::Pending, OperationInput::Tick { cancel_requested: true }) => {
                let op = Operation {
                    status: OperationStatus::Cancelled,
                    cancel_requested: true,
                    finished_at: Some(now),
                    ..self.clone()
                };
                let mut effects = vec![
                    Effect::StopPolling,
                    Effect::Emit(Event::Cancelled {
                        kind: self.kind,
                        id: self.tracked_id(),
                    }),
                ];
                if self.kind == OperationKind::Bundle {
                    effects.push(Effect::Emit(Event::DialogClosed { kind: self.kind }));
                }
                (op, effects)
            }

            // Pending: count the tick and pick the read mode
            (OperationStatus::Pending, OperationInput::Tick { cancel_requested: false }) => {
                let poll_count = self.poll_count + 1;
                if poll_count > self.config.max_ticks {
                    let op = Operation {
                        poll_count,
                        ..self.clone()
                    };
                    let message = format!("no result after {} polls", self.config.max_ticks);
                    return op.fail(FailureKind::Timeout, message, now);
                }

                let mode = ReadMode::for_tick(poll_count, self.config.force_every);
                let op = Operation {
                    poll_count,
                    ..self.clone()
                };
                (
                    op,
                    vec![Effect::Read {
                        force: mode.is_forced(),
                    }],
                )
            }

            // Pending: still running, progress only moves forward
            (
                OperationStatus::Pending,
                OperationInput::Observed(Classification::Pending { progress }),
            ) => {
                let reported = progress.map(|p| p.clamp(0.0, 1.0)).unwrap_or(0.0);
                let mut op = Operation {
                    consecutive_read_failures: 0,
                    ..self.clone()
                };
                if reported > self.progress {
                    op.progress = reported;
                    let effects = vec![Effect::Emit(Event::Progress {
                        kind: self.kind,
                        id: self.tracked_id(),
                        progress: reported,
                    })];
                    return (op, effects);
                }
                (op, vec![])
            }

            // Pending → Ready: stop polling and defer the completion
            (OperationStatus::Pending, OperationInput::Observed(Classification::Ready)) => {
                let op = Operation {
                    status: OperationStatus::Ready,
                    progress: 1.0,
                    consecutive_read_failures: 0,
                    ..self.clone()
                };
                let effects = vec![
                    Effect::StopPolling,
                    Effect::Emit(Event::Ready {
                        kind: self.kind,
                        id: self.tracked_id(),
                    }),
                    Effect::ScheduleCompletion {
                        delay: self.config.completion_delay,
                    },
                ];
                (op, effects)
            }

            // Pending → Failed: the resource reports an error
            (
                OperationStatus::Pending,
                OperationInput::Observed(Classification::Failed { message }),
            ) => self.fail(FailureKind::Backend, message, now),

            // Pending: transport failures are retried until the bound is exceeded
            (OperationStatus::Pending, OperationInput::ReadFailed { error }) => {
                let failures = self.consecutive_read_failures + 1;
                let op = Operation {
                    consecutive_read_failures: failures,
                    ..self.clone()
                };
                if failures > self.config.max_read_failures {
                    return op.fail(FailureKind::Unreachable, error, now);
                }
                (op, vec![])
            }

            // Ready: run the completion side effect exactly once
            (OperationStatus::Ready, OperationInput::CompletionDue) => {
                if self.downloading {
                    return (self.clone(), vec![]);
                }
                let op = Operation {
                    downloading: true,
                    ..self.clone()
                };
                let effects = vec![Effect::Download {
                    kind: self.kind,
                    id: self.tracked_id(),
                }];
                (op, effects)
            }

            // Ready → Idle once the artifact is on disk
            (OperationStatus::Ready, OperationInput::Downloaded { error: None })
                if self.downloading =>
            {
                let mut effects = vec![Effect::Emit(Event::Completed {
                    kind: self.kind,
                    id: self.tracked_id(),
                })];
                if self.kind == OperationKind::Bundle {
                    effects.push(Effect::Emit(Event::DialogClosed { kind: self.kind }));
                }
                let op = Operation {
                    finished_at: Some(now),
                    ..self.idle(Outcome::Completed)
                };
                (op, effects)
            }

            // Ready → Failed: no artifact, so the run did not succeed
            (OperationStatus::Ready, OperationInput::Downloaded { error: Some(error) })
                if self.downloading =>
            {
                self.fail(FailureKind::Download, error, now)
            }

            // Failed/Cancelled → Idle
            (OperationStatus::Failed, OperationInput::Reset) => {
                let outcome = Outcome::Failed {
                    kind: self.failure.unwrap_or(FailureKind::Backend),
                    message: self.last_error.clone().unwrap_or_default(),
                };
                (self.idle(outcome), vec![])
            }
            (OperationStatus::Cancelled, OperationInput::Reset) => {
                (self.idle(Outcome::Cancelled), vec![])
            }

            // Invalid transitions - no change
            _ => (self.clone(), vec![]),
        }
    }

    fn fail(&self, failure: FailureKind, message: String, now: Instant) -> (Operation, Vec<Effect>) {
        let op = Operation {
            status: OperationStatus::Failed,
            last_error: Some(message.clone()),
            failure: Some(failure),
            finished_at: Some(now),
            ..self.clone()
        };
        let mut effects = vec![
            Effect::StopPolling,
            Effect::Notify {
                title: format!("{} failed", self.kind.label()),
                message: match failure {
                    FailureKind::Backend => message.clone(),
                    other => format!("{}: {}", other, message),
                },
            },
            Effect::Emit(Event::Failed {
                kind: self.kind,
                id: self.tracked_id(),
                failure,
                message,
            }),
        ];
        if self.kind == OperationKind::Bundle {
            effects.push(Effect::Emit(Event::DialogClosed { kind: self.kind }));
        }
        (op, effects)
    }

    fn idle(&self, outcome: Outcome) -> Operation {
        Operation {
            id: None,
            run_id: None,
            status: OperationStatus::Idle,
            progress: 0.0,
            cancel_requested: false,
            last_error: None,
            failure: None,
            consecutive_read_failures: 0,
            downloading: false,
            last_outcome: Some(outcome),
            ..self.clone()
        }
    }

    fn tracked_id(&self) -> ResourceId {
        self.id
            .clone()
            .unwrap_or_else(|| ResourceId::new("", ""))
    }

    /// Check if an operation of this kind is in flight (not idle)
    pub fn is_active(&self) -> bool {
        self.status != OperationStatus::Idle
    }

    pub fn is_pending(&self) -> bool {
        self.status == OperationStatus::Pending
    }

    /// Check if the state machine is waiting for terminal bookkeeping
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            OperationStatus::Ready | OperationStatus::Failed | OperationStatus::Cancelled
        )
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
