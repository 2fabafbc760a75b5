//! Dispatcher struct and the per-tick execution loop.

use super::handler::HandlerRegistry;
use crate::queue::QueueManager;
use crate::request::{QueuedRequest, RequestOutcome};
use crate::shutdown::ShutdownState;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info};

/// What one tick accomplished.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickReport {
    /// Requests executed this tick (success or failure).
    pub processed: usize,

    /// Of those, how many failed.
    pub failed: usize,

    /// Requests still queued across all categories after the tick.
    pub remaining: usize,
}

/// Executes queued requests on the owning thread, one bounded batch per tick.
///
/// Construct this on the owning thread: the constructor captures the
/// current thread's identity, and [`tick`](Self::tick) fails fast if
/// invoked anywhere else. The per-request state machine is
/// `Queued → Executing → {Completed | Failed}`; `Executing` lasts only for
/// the handler call and is never externally observable.
pub struct Dispatcher {
    queue: Arc<QueueManager>,
    registry: HandlerRegistry,
    max_operations_per_cycle: usize,
    tracker_ttl: Option<Duration>,
    shutdown: Arc<ShutdownState>,
    owning_thread: thread::ThreadId,
}

impl Dispatcher {
    /// Creates a dispatcher bound to the calling thread.
    ///
    /// `max_operations_per_cycle` caps the work done per tick;
    /// `tracker_ttl`, when set, triggers an opportunistic age-based prune
    /// of the completed-request cache after each non-idle tick.
    pub fn new(
        queue: Arc<QueueManager>,
        registry: HandlerRegistry,
        max_operations_per_cycle: usize,
        tracker_ttl: Option<Duration>,
    ) -> Self {
        let shutdown = queue.shutdown_state();
        info!(
            max_operations_per_cycle,
            handlers = registry.len(),
            "Dispatcher created on owning thread"
        );
        Self {
            queue,
            registry,
            max_operations_per_cycle,
            tracker_ttl,
            shutdown,
            owning_thread: thread::current().id(),
        }
    }

    /// Runs one bounded drain-and-execute cycle.
    ///
    /// Call exactly once per host frame, from the owning thread only. At
    /// most `max_operations_per_cycle` requests are executed across all
    /// categories combined; a failing or panicking handler produces a
    /// failed outcome for its own request and nothing else. After
    /// shutdown is requested the tick is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if called from any thread other than the one that
    /// constructed the dispatcher.
    pub fn tick(&self) -> TickReport {
        self.assert_owning_thread("Dispatcher::tick");

        if self.shutdown.is_requested() {
            return TickReport::default();
        }

        let drained = self.queue.drain(self.max_operations_per_cycle);
        if drained.is_empty() {
            return TickReport {
                remaining: self.queue.snapshot().total_depth(),
                ..TickReport::default()
            };
        }

        let mut failed = 0;
        let processed = drained.len();
        for request in drained {
            let category = request.category;
            let outcome = self.execute_one(request);
            if !outcome.success {
                failed += 1;
            }
            self.queue.record_outcome(category, outcome);
        }

        if let Some(ttl) = self.tracker_ttl {
            self.queue.prune_completed(ttl);
        }

        let remaining = self.queue.snapshot().total_depth();
        debug!(processed, failed, remaining, "Tick complete");
        TickReport {
            processed,
            failed,
            remaining,
        }
    }

    /// Executes one request, containing handler errors and panics.
    fn execute_one(&self, request: QueuedRequest) -> RequestOutcome {
        let QueuedRequest {
            id,
            category,
            payload,
            submitted_at,
        } = request;

        let Some(handler) = self.registry.get(category) else {
            error!(request_id = %id, category = %category, "No handler registered");
            return RequestOutcome::failure(
                id,
                format!("no handler registered for category '{}'", category),
            );
        };

        let call = panic::catch_unwind(AssertUnwindSafe(|| handler.execute(&payload)));
        let queued_ms = submitted_at.elapsed().as_millis() as u64;

        match call {
            Ok(Ok(result)) => {
                debug!(request_id = %id, category = %category, queued_ms, "Request completed");
                RequestOutcome::success(id, result)
            }
            Ok(Err(e)) => {
                error!(
                    request_id = %id,
                    category = %category,
                    error = %e,
                    "Handler failed"
                );
                RequestOutcome::failure(id, e.to_string())
            }
            Err(panic_payload) => {
                let message = panic_message(&*panic_payload);
                error!(
                    request_id = %id,
                    category = %category,
                    panic = %message,
                    "Handler panicked"
                );
                RequestOutcome::failure(id, format!("handler panicked: {}", message))
            }
        }
    }

    fn assert_owning_thread(&self, operation: &str) {
        let current = thread::current();
        if current.id() != self.owning_thread {
            panic!(
                "{} must run on the owning thread, but ran on {:?} ({})",
                operation,
                current.id(),
                current.name().unwrap_or("unnamed")
            );
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("max_operations_per_cycle", &self.max_operations_per_cycle)
            .field("handlers", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
