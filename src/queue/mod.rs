//! Thread-safe request queues and the queue manager.
//!
//! This is the heart of the bridge: arbitrarily many HTTP handler threads
//! submit requests concurrently, and the single owning thread drains them
//! in bounded batches for execution. One FIFO queue exists per operation
//! [`Category`](crate::request::Category); within a category requests
//! execute in submission order, across categories no order is guaranteed.
//!
//! All mutable state (the queues, the per-category counters, and the
//! completed-request tracker) lives behind one mutex. Every operation on
//! that state is an O(1) append/pop or map lookup, so the lock is held
//! only briefly; at the request volumes this bridge serves (tens to low
//! hundreds of operations per second) that is simpler and easier to audit
//! than lock-free structures.

mod manager;
mod snapshot;

pub use manager::{QueueManager, SubmitError};
pub use snapshot::{CategoryStats, QueueSnapshot};
