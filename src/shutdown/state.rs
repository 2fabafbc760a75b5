//! Shared shutdown flags.

use std::sync::atomic::{AtomicBool, Ordering};

/// Monotonic shutdown flags shared across the bridge.
///
/// Each flag transitions false→true exactly once and is never reset short
/// of constructing a fresh bridge. All components read these to
/// short-circuit further work once teardown has begun.
#[derive(Debug, Default)]
pub struct ShutdownState {
    requested: AtomicBool,
    executor_stopped: AtomicBool,
    http_stopped: AtomicBool,
}

impl ShutdownState {
    /// Creates a state with all flags clear.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks shutdown as requested. Idempotent.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// True once shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Marks the tick source as stopped. Idempotent.
    pub fn mark_executor_stopped(&self) {
        self.executor_stopped.store(true, Ordering::Release);
    }

    /// True once the tick source has stopped.
    pub fn executor_stopped(&self) -> bool {
        self.executor_stopped.load(Ordering::Acquire)
    }

    /// Marks the HTTP transport as stopped. Idempotent.
    ///
    /// Also set when the shutdown wait times out, so the protocol is
    /// bounded even if the transport never signals.
    pub fn mark_http_stopped(&self) {
        self.http_stopped.store(true, Ordering::Release);
    }

    /// True once the HTTP transport has stopped (or been forced complete).
    pub fn http_stopped(&self) -> bool {
        self.http_stopped.load(Ordering::Acquire)
    }

    /// True once both the tick source and the transport have stopped.
    ///
    /// Shared state may only be released after this observes true.
    pub fn fully_stopped(&self) -> bool {
        self.executor_stopped() && self.http_stopped()
    }
}
