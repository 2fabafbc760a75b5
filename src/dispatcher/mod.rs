//! The main-thread executor.
//!
//! The dispatcher is the only component permitted to invoke the mutation
//! handlers, because those handlers touch the scene graph, which is not
//! thread-safe and is protected by convention rather than a lock: only the
//! owning thread ever calls into it. The dispatcher enforces that
//! convention with a cheap runtime thread-identity assertion.
//!
//! Once per host frame the owning thread calls [`Dispatcher::tick`], which
//! drains a bounded batch of requests and executes the handler registered
//! for each one's category. A handler error or panic becomes a failed
//! [`RequestOutcome`](crate::request::RequestOutcome): it never aborts
//! the tick, never touches sibling requests, and never reaches the host's
//! frame loop. The per-tick budget is the backpressure mechanism: bursts
//! accumulate in the queues and drain over subsequent ticks instead of
//! blowing the frame budget.

mod core;
mod handler;

pub use self::core::{Dispatcher, TickReport};
pub use handler::{Handler, HandlerError, HandlerRegistry};
