//! Point-in-time view of queue depths and cumulative counters.

use crate::request::Category;
use serde::Serialize;

/// Per-category depth and lifetime counters.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct CategoryStats {
    /// The category these numbers describe.
    pub category: Category,

    /// Requests currently waiting in this category's queue.
    pub depth: usize,

    /// Total requests ever submitted to this category.
    pub submitted: u64,

    /// Total requests that executed successfully.
    pub completed: u64,

    /// Total requests whose handler failed or panicked.
    pub failed: u64,
}

/// Consistent snapshot of all queues, taken under the manager's lock.
///
/// Used by the health endpoint and the metrics exporter; safe to request
/// from any thread.
#[derive(Clone, Debug, Serialize)]
pub struct QueueSnapshot {
    /// One entry per category, in drain order.
    pub categories: Vec<CategoryStats>,

    /// Outcomes currently retained in the completed-request cache.
    pub completed_cached: usize,
}

impl QueueSnapshot {
    /// Total requests waiting across all categories.
    pub fn total_depth(&self) -> usize {
        self.categories.iter().map(|c| c.depth).sum()
    }

    /// Total requests ever submitted.
    pub fn total_submitted(&self) -> u64 {
        self.categories.iter().map(|c| c.submitted).sum()
    }

    /// Total requests that reached a terminal state.
    pub fn total_processed(&self) -> u64 {
        self.categories.iter().map(|c| c.completed + c.failed).sum()
    }

    /// Stats for one category.
    pub fn category(&self, category: Category) -> &CategoryStats {
        &self.categories[category.index()]
    }
}
