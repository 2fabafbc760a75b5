//! Thin request/response adapter between transport threads and the queue.

use super::schemas::{HealthResponse, StatusResponse, SubmitResponse};
use crate::queue::QueueManager;
use crate::request::{Category, Payload, RequestId};
use std::sync::Arc;
use tracing::warn;

/// Name reported by the health endpoint.
const SERVICE_NAME: &str = "stagebridge";

/// What transport handler threads call instead of the queue directly.
///
/// Every method is total: bad input and rejected submissions become
/// structured error responses, never panics or transport-level failures.
/// Cheap to clone; handler threads each hold their own copy.
#[derive(Clone, Debug)]
pub struct ApiFacade {
    queue: Arc<QueueManager>,
}

impl ApiFacade {
    /// Creates a facade over the shared queue manager.
    pub fn new(queue: Arc<QueueManager>) -> Self {
        Self { queue }
    }

    /// Submits a request under the named category.
    ///
    /// The category arrives as a string straight off the wire; an unknown
    /// name is rejected here rather than queued and failed later.
    pub fn submit(&self, category: &str, payload: Payload) -> SubmitResponse {
        let category: Category = match category.parse() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Submission rejected");
                return SubmitResponse::rejected(e.to_string());
            }
        };

        match self.queue.submit(category, payload) {
            Ok(id) => SubmitResponse::accepted(id, format!("{} request queued", category)),
            Err(e) => {
                warn!(category = %category, error = %e, "Submission rejected");
                SubmitResponse::rejected(e.to_string())
            }
        }
    }

    /// Reports the outcome of a previously submitted request.
    ///
    /// `not_found` covers queued, unknown, and evicted alike; pollers
    /// treat it as "try again or give up", never as an error.
    pub fn request_status(&self, id: &str) -> StatusResponse {
        let id = RequestId::from(id);
        match self.queue.status(&id) {
            Some(outcome) => {
                let result = outcome.success.then_some(outcome.result);
                StatusResponse::completed(id, result, outcome.error)
            }
            None => StatusResponse::not_found(id),
        }
    }

    /// Liveness probe with current queue depths and counters.
    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            success: true,
            service: SERVICE_NAME.to_string(),
            accepting_requests: !self.queue.shutdown_state().is_requested(),
            queues: self.queue.snapshot(),
        }
    }
}
