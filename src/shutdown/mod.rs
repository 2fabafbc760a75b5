//! Coordinated multi-phase shutdown.
//!
//! Teardown has to satisfy two conflicting constraints: steps that touch
//! host-owned resources must run on the owning thread, while stopping the
//! HTTP transport can block on an in-flight connection and therefore must
//! not. The protocol here resolves that with a strict phase sequence:
//!
//! 1. Set `shutdown_requested`: new submissions are rejected and the
//!    dispatcher's tick becomes a no-op.
//! 2. Mark the executor stopped; the host stops invoking `tick()`.
//! 3. Spawn a worker thread that drives the transport layer's (possibly
//!    blocking) shutdown and signals completion over a channel.
//! 4. Wait on that channel with a bounded timeout; if it elapses, log a
//!    warning and force-mark the transport stopped rather than hang.
//! 5. Only then report completion, after which the host may release shared
//!    state.
//!
//! Work still queued when shutdown begins is abandoned: the flags
//! are monotonic and nothing drains the queues again. Callers that need
//! at-least-once semantics must re-submit after reconnecting.

mod coordinator;
mod state;

pub use coordinator::{ShutdownCoordinator, ShutdownReport};
pub use state::ShutdownState;
