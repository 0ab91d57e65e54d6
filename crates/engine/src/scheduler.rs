// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer heap driving poll ticks and the deferred completion

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

/// Timer id of the repeating poll tick
pub const TICK_TIMER: &str = "poll-tick";
/// Timer id of the one-shot deferred completion
pub const COMPLETION_TIMER: &str = "completion";

/// A scheduled item
#[derive(Debug, Clone)]
pub struct ScheduledItem {
    pub id: String,
    pub fire_at: Instant,
    pub kind: ScheduledKind,
    pub repeat: Option<Duration>,
}

/// The kind of scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledKind {
    /// Evaluate the tracked resource
    Tick,
    /// Run the completion side effect of a ready operation
    Completion,
}

impl PartialEq for ScheduledItem {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.id == other.id
    }
}

impl Eq for ScheduledItem {}

impl PartialOrd for ScheduledItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-heap: earliest first
        Reverse(self.fire_at).cmp(&Reverse(other.fire_at))
    }
}

/// Manages scheduled events.
///
/// A repeating item that fires is not put back into the heap. It stays in
/// flight until [`PollScheduler::rearm`] is called, so the next fire is
/// always measured from the end of the previous tick's work and two ticks
/// of the same item can never overlap.
#[derive(Debug, Default)]
pub struct PollScheduler {
    items: BinaryHeap<ScheduledItem>,
    in_flight: HashMap<String, ScheduledItem>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer, replacing any item with the same id
    pub fn schedule(&mut self, id: impl Into<String>, fire_at: Instant, kind: ScheduledKind) {
        let id = id.into();
        self.cancel(&id);
        self.items.push(ScheduledItem {
            id,
            fire_at,
            kind,
            repeat: None,
        });
    }

    /// Schedule a repeating timer, replacing any item with the same id
    pub fn schedule_repeating(
        &mut self,
        id: impl Into<String>,
        fire_at: Instant,
        interval: Duration,
        kind: ScheduledKind,
    ) {
        let id = id.into();
        self.cancel(&id);
        self.items.push(ScheduledItem {
            id,
            fire_at,
            kind,
            repeat: Some(interval),
        });
    }

    /// Cancel a scheduled or in-flight item. Cancelling twice is a no-op.
    pub fn cancel(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
        self.in_flight.remove(id);
    }

    /// Get all items that should fire at or before the given time
    pub fn poll(&mut self, now: Instant) -> Vec<ScheduledItem> {
        let mut ready = Vec::new();

        while let Some(item) = self.items.peek() {
            if item.fire_at > now {
                break;
            }

            let Some(item) = self.items.pop() else {
                break;
            };

            if item.repeat.is_some() {
                self.in_flight.insert(item.id.clone(), item.clone());
            }

            ready.push(item);
        }

        ready
    }

    /// Put a fired repeating item back, one interval after `now`.
    ///
    /// Does nothing if the item was cancelled while in flight.
    pub fn rearm(&mut self, id: &str, now: Instant) {
        let Some(item) = self.in_flight.remove(id) else {
            return;
        };
        if let Some(interval) = item.repeat {
            self.items.push(ScheduledItem {
                fire_at: now + interval,
                ..item
            });
        }
    }

    /// Check if scheduler has any pending or in-flight items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.in_flight.is_empty()
    }

    /// Check if an item is waiting in the heap or in flight
    pub fn is_scheduled(&self, id: &str) -> bool {
        self.in_flight.contains_key(id) || self.items.iter().any(|item| item.id == id)
    }

    /// Get the next fire time, if any
    pub fn next_fire_time(&self) -> Option<Instant> {
        self.items.peek().map(|item| item.fire_at)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
