// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracker for one operation kind
//!
//! The tracker owns the [`Operation`] record, feeds it inputs and performs the
//! effects the state machine returns: store reads, timers, notifications,
//! downloads and event publication. A background driver task sleeps until the
//! next timer and calls [`Tracker::tick`] or [`Tracker::complete`].

use crate::error::TrackerError;
use crate::scheduler::{PollScheduler, ScheduledKind, COMPLETION_TIMER, TICK_TIMER};
use hcitrack_adapters::{DownloadAdapter, NotifyAdapter, ResourceStore};
use hcitrack_core::{
    ClassifierRegistry, Clock, DownloadUrlBuilder, Effect, Event, IdGen, Operation,
    OperationInput, OperationKind, OperationStatus, ResourceId, TrackerConfig,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::Instrument;

const EVENT_CAPACITY: usize = 64;

/// Shared handle to a tracker; the initiator keeps one per operation kind
pub type TrackerHandle<S, N, D, C, I> = Arc<Tracker<S, N, D, C, I>>;

/// Tracker adapter dependencies
pub struct TrackerDeps<S, N, D> {
    pub store: S,
    pub notify: N,
    pub downloader: D,
}

pub struct Tracker<S, N, D, C: Clock, I: IdGen> {
    kind: OperationKind,
    store: S,
    notify: N,
    downloader: D,
    urls: Arc<dyn DownloadUrlBuilder>,
    classifiers: ClassifierRegistry,
    clock: C,
    id_gen: I,
    /// Held for the whole of a tick, so ticks never interleave
    operation: tokio::sync::Mutex<Operation>,
    cancel_requested: AtomicBool,
    dialog_open: AtomicBool,
    scheduler: Mutex<PollScheduler>,
    /// Guarded by `scheduler`: a driver task is looping over the timers
    driving: AtomicBool,
    driver: Mutex<Option<JoinHandle<()>>>,
    events: broadcast::Sender<Event>,
}

impl<S, N, D, C, I> Tracker<S, N, D, C, I>
where
    S: ResourceStore,
    N: NotifyAdapter,
    D: DownloadAdapter,
    C: Clock,
    I: IdGen,
{
    pub fn new(
        kind: OperationKind,
        deps: TrackerDeps<S, N, D>,
        urls: Arc<dyn DownloadUrlBuilder>,
        config: TrackerConfig,
        clock: C,
        id_gen: I,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            kind,
            store: deps.store,
            notify: deps.notify,
            downloader: deps.downloader,
            urls,
            classifiers: ClassifierRegistry::with_defaults(),
            clock,
            id_gen,
            operation: tokio::sync::Mutex::new(Operation::new(kind, config)),
            cancel_requested: AtomicBool::new(false),
            dialog_open: AtomicBool::new(false),
            scheduler: Mutex::new(PollScheduler::new()),
            driving: AtomicBool::new(false),
            driver: Mutex::new(None),
            events,
        }
    }

    /// Replace the status classifiers
    pub fn with_classifiers(mut self, classifiers: ClassifierRegistry) -> Self {
        self.classifiers = classifiers;
        self
    }

    /// Wrap into the shared handle used by the initiator and the driver
    pub fn into_handle(self) -> TrackerHandle<S, N, D, C, I> {
        Arc::new(self)
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Receive every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Snapshot of the operation record
    pub async fn operation(&self) -> Operation {
        self.operation.lock().await.clone()
    }

    /// Whether the repeating poll tick is armed
    pub fn is_polling(&self) -> bool {
        self.timers().is_scheduled(TICK_TIMER)
    }

    /// Whether a progress dialog for this kind should be on screen
    pub fn dialog_open(&self) -> bool {
        self.dialog_open.load(Ordering::SeqCst)
    }

    pub fn cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::SeqCst)
    }

    /// Request cancellation. Teardown happens at the next tick boundary.
    pub fn cancel(&self) {
        tracing::info!(kind = %self.kind, "cancel requested");
        self.cancel_requested.store(true, Ordering::SeqCst);
    }

    /// Start tracking `id` and spawn the driver task if none is running.
    ///
    /// Returns the run id of the new cycle.
    pub async fn start(self: &Arc<Self>, id: ResourceId) -> Result<String, TrackerError> {
        let run_id = self.begin(id).await?;

        let spawn = {
            // Checked under the scheduler lock so a driver that is about to
            // exit on an empty heap cannot race with the timer just armed
            let _timers = self.timers();
            !self.driving.swap(true, Ordering::SeqCst)
        };
        if spawn {
            let tracker = Arc::clone(self);
            let handle = tokio::spawn(async move { tracker.drive().await });
            *self.driver.lock().unwrap_or_else(|e| e.into_inner()) = Some(handle);
        }

        Ok(run_id)
    }

    /// Validate `id` and move the operation to Pending with polling armed.
    ///
    /// Does not spawn a driver; callers that step time by hand use this
    /// together with [`Tracker::tick`] and [`Tracker::complete`].
    pub async fn begin(&self, id: ResourceId) -> Result<String, TrackerError> {
        let mut op = self.operation.lock().await;
        if op.is_active() {
            return Err(TrackerError::AlreadyInProgress(self.kind));
        }
        if self.classifiers.get(self.kind).is_none() {
            return Err(TrackerError::NoClassifier(self.kind));
        }
        // Cleared before the lookup; a cancel that lands during it must survive
        self.cancel_requested.store(false, Ordering::SeqCst);

        match self
            .store
            .find(self.kind.resource_type(), &id.to_string(), false)
            .await
        {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                return Err(TrackerError::InvalidReference {
                    kind: self.kind,
                    id,
                })
            }
            Err(e) => return Err(e.into()),
        }

        let run_id = self.id_gen.next();
        tracing::info!(kind = %self.kind, %id, run_id = %run_id, "starting");

        self.run(
            &mut op,
            OperationInput::Start {
                id,
                run_id: run_id.clone(),
            },
        )
        .await?;
        Ok(run_id)
    }

    /// Evaluate the tracked resource once
    pub async fn tick(&self) -> Result<(), TrackerError> {
        let mut op = self.operation.lock().await;
        let cancel_requested = self.cancel_requested.load(Ordering::SeqCst);
        self.run(&mut op, OperationInput::Tick { cancel_requested })
            .await
    }

    /// Run the deferred completion of a ready operation
    pub async fn complete(&self) -> Result<(), TrackerError> {
        let mut op = self.operation.lock().await;
        self.run(&mut op, OperationInput::CompletionDue).await
    }

    /// Wait for the driver task to finish
    pub async fn wait(&self) {
        let handle = self
            .driver
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(kind = %self.kind, error = %e, "driver task failed");
            }
        }
    }

    fn timers(&self) -> MutexGuard<'_, PollScheduler> {
        self.scheduler.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply `input` and every input produced by its effects
    async fn run(&self, op: &mut Operation, input: OperationInput) -> Result<(), TrackerError> {
        let was_active = op.is_active();
        let mut inputs = VecDeque::from([input]);

        while let Some(input) = inputs.pop_front() {
            let (next, effects) = op.transition(input, &self.clock);
            *op = next;
            for effect in effects {
                if let Some(input) = self.execute(op, effect).await? {
                    inputs.push_back(input);
                }
            }
        }

        // Failed and Cancelled last only until their effects have run
        if matches!(op.status, OperationStatus::Failed | OperationStatus::Cancelled) {
            let (next, _) = op.transition(OperationInput::Reset, &self.clock);
            *op = next;
        }

        if was_active && !op.is_active() {
            self.cancel_requested.store(false, Ordering::SeqCst);
            let elapsed_ms = match (op.started_at, op.finished_at) {
                (Some(start), Some(end)) => end.saturating_duration_since(start).as_millis() as u64,
                _ => 0,
            };
            tracing::info!(
                kind = %self.kind,
                outcome = ?op.last_outcome,
                polls = op.poll_count,
                elapsed_ms,
                "finished"
            );
        }
        Ok(())
    }

    /// Perform one effect; store reads feed their result back as an input
    async fn execute(
        &self,
        op: &Operation,
        effect: Effect,
    ) -> Result<Option<OperationInput>, TrackerError> {
        match effect {
            Effect::Emit(event) => {
                self.emit(event);
                Ok(None)
            }

            Effect::ArmPolling { interval } => {
                let now = self.clock.now();
                self.timers().schedule_repeating(
                    TICK_TIMER,
                    now + interval,
                    interval,
                    ScheduledKind::Tick,
                );
                Ok(None)
            }

            Effect::StopPolling => {
                self.timers().cancel(TICK_TIMER);
                Ok(None)
            }

            Effect::Read { force } => self.read(op, force).await.map(Some),

            Effect::Notify { title, message } => {
                self.notify_error(&title, &message).await;
                Ok(None)
            }

            Effect::ScheduleCompletion { delay } => {
                let now = self.clock.now();
                self.timers()
                    .schedule(COMPLETION_TIMER, now + delay, ScheduledKind::Completion);
                Ok(None)
            }

            Effect::Download { kind, id } => Ok(Some(self.download(kind, &id).await)),
        }
    }

    async fn read(&self, op: &Operation, force: bool) -> Result<OperationInput, TrackerError> {
        let classifier = self
            .classifiers
            .get(self.kind)
            .ok_or(TrackerError::NoClassifier(self.kind))?;
        let Some(id) = op.id.as_ref().map(ToString::to_string) else {
            return Ok(OperationInput::ReadFailed {
                error: "no resource is being tracked".to_string(),
            });
        };
        let resource_type = self.kind.resource_type();

        let snapshot = if force {
            self.store.find(resource_type, &id, true).await
        } else {
            match self.store.by_id(resource_type, &id) {
                Some(snapshot) => Ok(snapshot),
                None => self.store.find(resource_type, &id, false).await,
            }
        };

        match snapshot {
            Ok(snapshot) => {
                let classification = classifier.classify(&snapshot);
                tracing::debug!(
                    kind = %self.kind,
                    id = %id,
                    poll = op.poll_count,
                    force,
                    ?classification,
                    "observed"
                );
                Ok(OperationInput::Observed(classification))
            }
            Err(e) => {
                tracing::warn!(
                    kind = %self.kind,
                    id = %id,
                    poll = op.poll_count,
                    error = %e,
                    "read failed, retrying next tick"
                );
                Ok(OperationInput::ReadFailed {
                    error: e.to_string(),
                })
            }
        }
    }

    async fn notify_error(&self, title: &str, message: &str) {
        tracing::error!(kind = %self.kind, title, message, "operation error");
        if let Err(e) = self.notify.notify_error(title, message).await {
            tracing::warn!(error = %e, "notification not delivered");
        }
    }

    async fn download(&self, kind: OperationKind, id: &ResourceId) -> OperationInput {
        let url = self.urls.build(kind, id);
        let file_name = artifact_file_name(kind, id);
        let error = match self.downloader.download(&url, &file_name).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(kind = %kind, %id, error = %e, "artifact download failed");
                Some(e.to_string())
            }
        };
        OperationInput::Downloaded { error }
    }

    fn emit(&self, event: Event) {
        match &event {
            Event::Started { .. } if self.kind == OperationKind::Bundle => {
                self.dialog_open.store(true, Ordering::SeqCst);
            }
            Event::DialogClosed { .. } => self.dialog_open.store(false, Ordering::SeqCst),
            _ => {}
        }

        match &event {
            Event::Progress { progress, .. } => {
                tracing::debug!(event = event.name(), kind = %self.kind, progress, "event")
            }
            _ => tracing::info!(event = event.name(), kind = %self.kind, "event"),
        }

        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Sleep until the next timer, fire it, repeat until no timers remain
    async fn drive(self: Arc<Self>) {
        let span = tracing::info_span!("driver", kind = %self.kind);

        async {
            loop {
                let next = {
                    let timers = self.timers();
                    let next = timers.next_fire_time();
                    if next.is_none() {
                        self.driving.store(false, Ordering::SeqCst);
                    }
                    next
                };
                let Some(at) = next else {
                    break;
                };

                tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await;

                let due = self.timers().poll(self.clock.now());
                for item in due {
                    match item.kind {
                        ScheduledKind::Tick => {
                            if let Err(e) = self.tick().await {
                                tracing::error!(error = %e, "tick failed, cancelling");
                                self.cancel();
                            }
                            self.timers().rearm(&item.id, self.clock.now());
                        }
                        ScheduledKind::Completion => {
                            if let Err(e) = self.complete().await {
                                tracing::error!(error = %e, "completion failed");
                            }
                        }
                    }
                }
            }
            tracing::debug!("driver stopped");
        }
        .instrument(span)
        .await
    }
}

/// File name the completion download is stored under
pub fn artifact_file_name(kind: OperationKind, id: &ResourceId) -> String {
    let ext = match kind {
        OperationKind::Bundle => "zip",
        OperationKind::ImageDownload => "img",
    };
    format!("{}_{}.{}", id.namespace(), id.name(), ext)
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
