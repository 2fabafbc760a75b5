//! Request identity and completed-request retention.
//!
//! The [`RequestTracker`] hands out unique request IDs and keeps the
//! outcomes of completed requests in a bounded, insertion-ordered cache.
//! When the cache is at capacity the oldest entry is evicted before a new
//! one is stored, so memory stays bounded no matter how long the process
//! runs. An optional TTL pass drops entries by age as well.
//!
//! Lookups for unknown or already-evicted IDs return `None`, which callers
//! must read as "still processing or too old to know" rather than failure.

use crate::request::{unix_now, Category, RequestId, RequestOutcome};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A stored outcome plus the instant it entered the cache (for TTL pruning).
#[derive(Clone, Debug)]
struct CacheEntry {
    outcome: RequestOutcome,
    stored_at: Instant,
}

/// ID generation plus the bounded FIFO cache of completed requests.
///
/// ID generation is lock-free (an atomic counter); the cache itself is
/// plain data, guarded by whichever lock owns the tracker. In this crate
/// that is the queue manager's single mutex.
#[derive(Debug)]
pub struct RequestTracker {
    /// Monotonic counter feeding [`RequestId::from_parts`].
    counter: AtomicU64,

    /// Maximum number of retained outcomes.
    capacity: usize,

    /// Outcomes by request ID.
    entries: HashMap<RequestId, CacheEntry>,

    /// Insertion order, oldest at the front. IDs are unique, so this is
    /// exactly the eviction order.
    order: VecDeque<RequestId>,
}

impl RequestTracker {
    /// Creates a tracker retaining up to `capacity` completed requests.
    ///
    /// A capacity of zero is treated as one so that the most recent outcome
    /// is always retrievable.
    pub fn new(capacity: usize) -> Self {
        Self {
            counter: AtomicU64::new(0),
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Generates the next unique request ID for a category.
    ///
    /// Safe to call from any thread holding a shared reference.
    pub fn next_id(&self, category: Category) -> RequestId {
        let counter = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        RequestId::from_parts(category, counter, unix_now() as u64)
    }

    /// Stores a completed outcome, evicting the oldest entry first when at
    /// capacity. Both the eviction and the insert are O(1).
    pub fn store(&mut self, outcome: RequestOutcome) {
        let id = outcome.request_id.clone();

        if self.entries.contains_key(&id) {
            // Replace in place; insertion order is unchanged.
            self.entries.insert(
                id,
                CacheEntry {
                    outcome,
                    stored_at: Instant::now(),
                },
            );
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        self.order.push_back(id.clone());
        self.entries.insert(
            id,
            CacheEntry {
                outcome,
                stored_at: Instant::now(),
            },
        );
    }

    /// Looks up the outcome for a request ID.
    ///
    /// `None` is a normal result, not an error: the request is either still
    /// queued, unknown, or its outcome has been evicted.
    pub fn get(&self, id: &RequestId) -> Option<&RequestOutcome> {
        self.entries.get(id).map(|entry| &entry.outcome)
    }

    /// Number of retained outcomes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no outcomes are retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries older than `ttl`, returning how many were removed.
    ///
    /// Insertion order is also age order, so the pass stops at the first
    /// entry young enough to keep.
    pub fn prune(&mut self, ttl: Duration) -> usize {
        let mut removed = 0;
        while let Some(front) = self.order.front() {
            let expired = self
                .entries
                .get(front)
                .map(|entry| entry.stored_at.elapsed() >= ttl)
                .unwrap_or(true);
            if !expired {
                break;
            }
            if let Some(id) = self.order.pop_front() {
                self.entries.remove(&id);
                removed += 1;
            }
        }
        removed
    }

    /// Clears all retained outcomes.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        self.order.clear();
        removed
    }
}
