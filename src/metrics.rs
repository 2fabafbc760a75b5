//! Metrics export over queue state.
//!
//! The queue manager's snapshot is the single source of truth; this module
//! only transforms it into presentation formats. Two are supported: a JSON
//! document for the health/status endpoints and Prometheus text exposition
//! for scrapers.

use crate::queue::QueueManager;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Instant;

/// Point-in-time metrics document.
#[derive(Clone, Debug, Serialize)]
pub struct MetricsReport {
    /// Seconds since the exporter was created.
    pub uptime_seconds: f64,

    /// Requests accepted across all categories, lifetime.
    pub requests_submitted: u64,

    /// Requests completed successfully, lifetime.
    pub requests_completed: u64,

    /// Requests completed with failure, lifetime.
    pub requests_failed: u64,

    /// Requests currently waiting across all queues.
    pub queue_depth: usize,

    /// Outcomes currently retained for polling.
    pub completed_cached: usize,

    /// Per-category depth, keyed by wire name.
    pub depth_by_category: Vec<(String, usize)>,
}

/// Transforms queue snapshots into exportable metrics.
pub struct MetricsExporter {
    queue: Arc<QueueManager>,
    started: Instant,
}

impl MetricsExporter {
    /// Creates an exporter; uptime is measured from this call.
    pub fn new(queue: Arc<QueueManager>) -> Self {
        Self::starting_at(queue, Instant::now())
    }

    /// Creates an exporter measuring uptime from an earlier instant,
    /// typically the moment the bridge was constructed.
    pub fn starting_at(queue: Arc<QueueManager>, started: Instant) -> Self {
        Self { queue, started }
    }

    /// Builds a report from the current snapshot.
    pub fn report(&self) -> MetricsReport {
        let snapshot = self.queue.snapshot();
        let mut submitted = 0;
        let mut completed = 0;
        let mut failed = 0;
        let mut depths = Vec::with_capacity(snapshot.categories.len());

        for stats in &snapshot.categories {
            submitted += stats.submitted;
            completed += stats.completed;
            failed += stats.failed;
            depths.push((stats.category.as_str().to_string(), stats.depth));
        }

        MetricsReport {
            uptime_seconds: self.started.elapsed().as_secs_f64(),
            requests_submitted: submitted,
            requests_completed: completed,
            requests_failed: failed,
            queue_depth: snapshot.total_depth(),
            completed_cached: snapshot.completed_cached,
            depth_by_category: depths,
        }
    }

    /// Current metrics as a JSON document.
    pub fn to_json(&self) -> Value {
        let report = self.report();
        // A struct of primitives and strings cannot fail to serialize.
        serde_json::to_value(&report).unwrap_or(Value::Null)
    }

    /// Current metrics in Prometheus text exposition format.
    pub fn to_prometheus(&self) -> String {
        let report = self.report();
        let mut out = String::with_capacity(1024);

        let _ = writeln!(
            out,
            "# HELP stagebridge_uptime_seconds Seconds since the bridge started."
        );
        let _ = writeln!(out, "# TYPE stagebridge_uptime_seconds gauge");
        let _ = writeln!(
            out,
            "stagebridge_uptime_seconds {:.3}",
            report.uptime_seconds
        );

        let _ = writeln!(
            out,
            "# HELP stagebridge_requests_submitted_total Requests accepted into the queues."
        );
        let _ = writeln!(out, "# TYPE stagebridge_requests_submitted_total counter");
        let _ = writeln!(
            out,
            "stagebridge_requests_submitted_total {}",
            report.requests_submitted
        );

        let _ = writeln!(
            out,
            "# HELP stagebridge_requests_completed_total Requests executed successfully."
        );
        let _ = writeln!(out, "# TYPE stagebridge_requests_completed_total counter");
        let _ = writeln!(
            out,
            "stagebridge_requests_completed_total {}",
            report.requests_completed
        );

        let _ = writeln!(
            out,
            "# HELP stagebridge_requests_failed_total Requests that failed or panicked."
        );
        let _ = writeln!(out, "# TYPE stagebridge_requests_failed_total counter");
        let _ = writeln!(
            out,
            "stagebridge_requests_failed_total {}",
            report.requests_failed
        );

        let _ = writeln!(
            out,
            "# HELP stagebridge_queue_depth Requests waiting, per category."
        );
        let _ = writeln!(out, "# TYPE stagebridge_queue_depth gauge");
        for (category, depth) in &report.depth_by_category {
            let _ = writeln!(
                out,
                "stagebridge_queue_depth{{category=\"{}\"}} {}",
                category, depth
            );
        }

        let _ = writeln!(
            out,
            "# HELP stagebridge_completed_cached Outcomes retained for polling."
        );
        let _ = writeln!(out, "# TYPE stagebridge_completed_cached gauge");
        let _ = writeln!(
            out,
            "stagebridge_completed_cached {}",
            report.completed_cached
        );

        out
    }
}

impl std::fmt::Debug for MetricsExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsExporter")
            .field("uptime", &self.started.elapsed())
            .finish_non_exhaustive()
    }
}
