//! The queue manager: submit, drain, record, look up.

use super::snapshot::{CategoryStats, QueueSnapshot};
use crate::request::{Category, Payload, QueuedRequest, RequestId, RequestOutcome};
use crate::shutdown::ShutdownState;
use crate::tracker::RequestTracker;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors returned when a submission is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The bridge is shutting down; no new work is accepted.
    #[error("bridge is shutting down; submission rejected")]
    ShuttingDown,
}

/// Lifetime counters for one category.
#[derive(Clone, Copy, Debug, Default)]
struct Counters {
    submitted: u64,
    completed: u64,
    failed: u64,
}

/// Everything the manager's single lock protects.
///
/// Public methods lock exactly once and never call back into the manager,
/// so re-entry on the lock is impossible by construction.
struct QueueState {
    queues: [VecDeque<QueuedRequest>; Category::ALL.len()],
    counters: [Counters; Category::ALL.len()],
    tracker: RequestTracker,
}

/// Thread-safe front door for all queued scene work.
///
/// Producers (HTTP handler threads) call [`submit`](Self::submit) and
/// [`status`](Self::status) concurrently; the single consumer (the
/// dispatcher, on the owning thread) calls [`drain`](Self::drain) and
/// [`record_outcome`](Self::record_outcome). None of these block beyond
/// the brief lock hold.
pub struct QueueManager {
    inner: Mutex<QueueState>,
    shutdown: Arc<ShutdownState>,
}

impl QueueManager {
    /// Creates a manager retaining up to `max_completed` outcomes.
    pub fn new(max_completed: usize, shutdown: Arc<ShutdownState>) -> Self {
        Self {
            inner: Mutex::new(QueueState {
                queues: Default::default(),
                counters: Default::default(),
                tracker: RequestTracker::new(max_completed),
            }),
            shutdown,
        }
    }

    /// Queues a request and returns its ID for status polling.
    ///
    /// Callable from any thread. Never blocks on I/O; the only wait is the
    /// short lock hold. Fails once shutdown has been requested, since work
    /// submitted after that point would be abandoned anyway.
    pub fn submit(&self, category: Category, payload: Payload) -> Result<RequestId, SubmitError> {
        if self.shutdown.is_requested() {
            return Err(SubmitError::ShuttingDown);
        }

        let mut state = self.inner.lock();
        let id = state.tracker.next_id(category);
        state.queues[category.index()].push_back(QueuedRequest::new(id.clone(), category, payload));
        state.counters[category.index()].submitted += 1;

        info!(request_id = %id, category = %category, "Request queued");
        Ok(id)
    }

    /// Removes up to `max_total` requests for execution.
    ///
    /// Consumer-only (the dispatcher enforces the owning-thread rule).
    /// Categories are serviced in the fixed [`Category::ALL`] order, each
    /// drained to exhaustion before the next, until the shared budget is
    /// spent. A drained request is never re-enqueued.
    pub fn drain(&self, max_total: usize) -> Vec<QueuedRequest> {
        let mut state = self.inner.lock();
        let mut drained = Vec::new();

        for category in Category::ALL {
            let queue = &mut state.queues[category.index()];
            while drained.len() < max_total {
                match queue.pop_front() {
                    Some(request) => drained.push(request),
                    None => break,
                }
            }
            if drained.len() >= max_total {
                break;
            }
        }

        if !drained.is_empty() {
            debug!(count = drained.len(), budget = max_total, "Drained requests");
        }
        drained
    }

    /// Records the terminal outcome of an executed request.
    ///
    /// Forwards to the tracker (which evicts the oldest entry if at
    /// capacity) and bumps the category's completed or failed counter.
    pub fn record_outcome(&self, category: Category, outcome: RequestOutcome) {
        let mut state = self.inner.lock();
        if outcome.success {
            state.counters[category.index()].completed += 1;
        } else {
            state.counters[category.index()].failed += 1;
        }
        state.tracker.store(outcome);
    }

    /// Looks up the outcome of a request. Pure read, any thread.
    ///
    /// `None` means queued, unknown, or evicted; the caller cannot
    /// distinguish these and should keep polling or give up.
    pub fn status(&self, id: &RequestId) -> Option<RequestOutcome> {
        self.inner.lock().tracker.get(id).cloned()
    }

    /// Takes a consistent snapshot of depths and counters. Any thread.
    pub fn snapshot(&self) -> QueueSnapshot {
        let state = self.inner.lock();
        let categories = Category::ALL
            .iter()
            .map(|&category| {
                let counters = state.counters[category.index()];
                CategoryStats {
                    category,
                    depth: state.queues[category.index()].len(),
                    submitted: counters.submitted,
                    completed: counters.completed,
                    failed: counters.failed,
                }
            })
            .collect();

        QueueSnapshot {
            categories,
            completed_cached: state.tracker.len(),
        }
    }

    /// Drops completed outcomes older than `ttl`. Returns the count removed.
    pub fn prune_completed(&self, ttl: Duration) -> usize {
        let removed = self.inner.lock().tracker.prune(ttl);
        if removed > 0 {
            debug!(removed, "Pruned expired completed requests");
        }
        removed
    }

    /// Empties the completed-request cache. Returns the count removed.
    pub fn clear_completed(&self) -> usize {
        let removed = self.inner.lock().tracker.clear();
        info!(removed, "Cleared completed request cache");
        removed
    }

    /// Returns the shared shutdown state.
    pub fn shutdown_state(&self) -> Arc<ShutdownState> {
        Arc::clone(&self.shutdown)
    }
}

impl std::fmt::Debug for QueueManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("QueueManager")
            .field("total_depth", &snapshot.total_depth())
            .field("completed_cached", &snapshot.completed_cached)
            .finish()
    }
}
