// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! hcitrack execution engine: poll scheduling and effect execution

mod error;
mod scheduler;
mod tracker;

pub use error::TrackerError;
pub use scheduler::{PollScheduler, ScheduledItem, ScheduledKind, COMPLETION_TIMER, TICK_TIMER};
pub use tracker::{artifact_file_name, Tracker, TrackerDeps, TrackerHandle};
