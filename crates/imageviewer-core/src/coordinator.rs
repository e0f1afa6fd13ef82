//! Asynchronous operation coordinator.
//!
//! Accepts per-file mutating requests, runs each on a background thread and
//! reports completion through a [`NotificationSink`].
//!
//! Rotations are coalesced per file: while a round for a file is in flight,
//! further rotation requests only add to that file's accumulated angle, and
//! the worker of the round claims the freshest total right before it touches
//! the file. Requests that arrive after the claim are picked up by exactly one
//! follow-up round. Wallpaper and trash requests are one-shot and never merged.
//!
//! Lock discipline: the [`PendingState`] lock is never held across a thread
//! spawn, an executor call or a sink call, so sinks may call back into the
//! coordinator.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::events::SharedNotificationSink;
use crate::executor::{self, SharedExecutor};
use crate::models::{OperationKind, OperationOutcome, OperationRequest, ResourceKey};
use crate::pending::{PendingGuard, PendingState};

/// What [`Coordinator::submit`] did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A new worker was dispatched.
    Started,
    /// Merged into the round already in flight for this file.
    Coalesced,
}

struct Shared {
    pending: PendingState,
    executor: SharedExecutor,
    sink: SharedNotificationSink,
    next_worker: AtomicU64,
}

/// Cheaply cloneable handle; clones share the same state.
#[derive(Clone)]
pub struct Coordinator {
    shared: Arc<Shared>,
}

impl Coordinator {
    pub fn new(executor: SharedExecutor, sink: SharedNotificationSink) -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: PendingState::new(),
                executor,
                sink,
                next_worker: AtomicU64::new(1),
            }),
        }
    }

    /// Submit a request for `key`. Never blocks on I/O.
    pub fn submit(&self, key: ResourceKey, request: OperationRequest) -> Dispatch {
        match request {
            OperationRequest::Rotate { degrees } => self.rotate(key, degrees),
            other => {
                self.shared.pending.begin_operation();
                tracing::debug!(key = %key, request = ?other, "dispatching one-shot operation");
                self.dispatch_one_shot(key, other);
                Dispatch::Started
            }
        }
    }

    /// Rotate `key` by `degrees`, merging with any round already in flight.
    pub fn rotate(&self, key: ResourceKey, degrees: i32) -> Dispatch {
        let start = {
            let mut pending = self.shared.pending.lock();
            let prior = pending.accumulate(&key, i64::from(degrees));
            if pending.is_round_active(&key) {
                tracing::debug!(key = %key, degrees, prior = ?prior, "rotation coalesced");
                false
            } else {
                pending.start_round(&key);
                pending.begin_operation();
                true
            }
        };

        if start {
            tracing::debug!(key = %key, degrees, "starting rotation round");
            self.dispatch_rotation_round(key);
            Dispatch::Started
        } else {
            Dispatch::Coalesced
        }
    }

    /// Drop the accumulated, not yet claimed rotation for `key`.
    ///
    /// A worker already running is not interrupted and still applies what it
    /// claimed; no follow-up round is scheduled from the dropped amount.
    /// Returns the dropped angle, if any.
    pub fn cancel(&self, key: &ResourceKey) -> Option<i64> {
        let dropped = self.shared.pending.clear(key);
        if let Some(angle) = dropped {
            tracing::debug!(key = %key, angle, "pending rotation cancelled");
        }
        dropped
    }

    pub fn has_pending_operations(&self) -> bool {
        !self.shared.pending.is_idle()
    }

    /// Number of dispatched operations whose completion has not been handled.
    pub fn in_flight(&self) -> usize {
        self.shared.pending.in_flight()
    }

    /// Accumulated angle not yet claimed by a worker.
    pub fn pending_rotation(&self, key: &ResourceKey) -> Option<i64> {
        self.shared.pending.peek(key)
    }

    /// Block until no operation is in flight.
    ///
    /// Only guarantees idleness at some instant after the call; concurrent
    /// submits may make the coordinator busy again right away.
    pub fn wait_until_idle(&self) {
        self.shared.pending.wait_until_idle();
    }

    /// Bounded variant of [`wait_until_idle`](Self::wait_until_idle).
    pub fn wait_until_idle_timeout(&self, timeout: Duration) -> bool {
        self.shared.pending.wait_until_idle_timeout(timeout)
    }

    fn spawn_worker<F>(&self, job: F) -> std::io::Result<()>
    where
        F: FnOnce(Coordinator) + Send + 'static,
    {
        let id = self.shared.next_worker.fetch_add(1, Ordering::Relaxed);
        let this = self.clone();
        thread::Builder::new()
            .name(format!("imageviewer-op-{}", id))
            .spawn(move || job(this))
            .map(|_| ())
    }

    fn dispatch_rotation_round(&self, key: ResourceKey) {
        let job_key = key.clone();
        let spawned = self.spawn_worker(move |this| this.run_rotation_round(job_key));

        if let Err(e) = spawned {
            tracing::error!(key = %key, "failed to spawn rotation worker: {}", e);
            let claimed = self.shared.pending.take_and_clear(&key);
            tracing::warn!(key = %key, claimed, "rotation dropped");
            self.finish_rotation_round(key, false);
        }
    }

    fn run_rotation_round(self, key: ResourceKey) {
        let angle = self.shared.pending.take_and_clear(&key);
        tracing::debug!(key = %key, angle, "rotation round claimed");

        let result = executor::guarded("rotation", || self.shared.executor.rotate(&key, angle));
        let success = match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, angle, code = e.code(), "rotation failed: {}", e);
                false
            }
        };

        self.finish_rotation_round(key, success);
    }

    fn finish_rotation_round(&self, key: ResourceKey, success: bool) {
        // The round stays marked active while notifying, so completions for the
        // same file never overlap.
        self.shared
            .sink
            .on_operation_complete(&key, OperationKind::Rotation, success);

        let (follow_up, idle) = {
            let mut pending = self.shared.pending.lock();
            let follow_up = match pending.peek(&key) {
                Some(total) if total != 0 => true,
                Some(_) => {
                    pending.clear(&key);
                    false
                }
                None => false,
            };
            if follow_up {
                pending.begin_operation();
            } else {
                pending.finish_round(&key);
            }
            let idle = end_operation(&mut pending);
            (follow_up, idle)
        };

        if idle {
            self.notify_all_complete();
        }

        if follow_up {
            tracing::debug!(key = %key, "starting follow-up rotation round");
            self.dispatch_rotation_round(key);
        }
    }

    fn dispatch_one_shot(&self, key: ResourceKey, request: OperationRequest) {
        let job_key = key.clone();
        let spawned = self.spawn_worker(move |this| {
            let outcome = executor::execute_one_shot(this.shared.executor.as_ref(), &job_key, &request);
            this.finish_one_shot(job_key, outcome);
        });

        if let Err(e) = spawned {
            tracing::error!(key = %key, "failed to spawn worker: {}", e);
            self.finish_one_shot(key, OperationOutcome::failed(&request));
        }
    }

    fn finish_one_shot(&self, key: ResourceKey, outcome: OperationOutcome) {
        for (kind, success) in outcome.results {
            self.shared.sink.on_operation_complete(&key, kind, success);
        }

        let idle = end_operation(&mut self.shared.pending.lock());
        if idle {
            self.notify_all_complete();
        }
    }

    /// Deliver the all-complete notification, then let drain waiters go.
    fn notify_all_complete(&self) {
        let sink = &self.shared.sink;
        if catch_unwind(AssertUnwindSafe(|| sink.on_all_operations_complete())).is_err() {
            tracing::error!("all-operations-complete handler panicked");
        }
        if let Err(e) = self.shared.pending.end_notification() {
            tracing::error!("{}", e);
        }
    }
}

/// Returns whether this call brought the counter to zero.
///
/// If so, drain waiters are held until [`Coordinator::notify_all_complete`]
/// has run.
fn end_operation(pending: &mut PendingGuard<'_>) -> bool {
    match pending.end_operation() {
        Ok(0) => {
            pending.begin_notification();
            true
        }
        Ok(_) => false,
        Err(e) => {
            tracing::error!("{}", e);
            false
        }
    }
}
