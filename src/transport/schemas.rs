//! Wire shapes for the HTTP boundary.
//!
//! These mirror what polling clients actually see: a submission always
//! answers immediately with a request ID, and the status endpoint reports
//! `completed` or `not_found`, never an intermediate state, and never an
//! HTTP-level error for an unknown ID.

use crate::queue::QueueSnapshot;
use crate::request::{Payload, RequestId};
use serde::Serialize;

/// Response to a submission.
#[derive(Clone, Debug, Serialize)]
pub struct SubmitResponse {
    /// Whether the request was accepted into a queue.
    pub success: bool,

    /// ID to poll with, present on acceptance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,

    /// Human-readable acceptance note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Rejection reason (e.g. shutting down, unknown category).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmitResponse {
    /// An accepted submission.
    pub fn accepted(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            success: true,
            request_id: Some(request_id),
            message: Some(message.into()),
            error: None,
        }
    }

    /// A rejected submission.
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Response to a status poll.
#[derive(Clone, Debug, Serialize)]
pub struct StatusResponse {
    /// Always true: not-found is a normal answer, not a failure.
    pub success: bool,

    /// The polled request ID, echoed back.
    pub request_id: RequestId,

    /// `"completed"` or `"not_found"`.
    pub status: &'static str,

    /// Handler result, present when completed successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Payload>,

    /// Handler error, present when completed with failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusResponse {
    /// A completed request (successfully or not).
    pub fn completed(
        request_id: RequestId,
        result: Option<Payload>,
        error: Option<String>,
    ) -> Self {
        Self {
            success: true,
            request_id,
            status: "completed",
            result,
            error,
        }
    }

    /// Still queued, unknown, or evicted.
    pub fn not_found(request_id: RequestId) -> Self {
        Self {
            success: true,
            request_id,
            status: "not_found",
            result: None,
            error: None,
        }
    }
}

/// Response to a health probe.
#[derive(Clone, Debug, Serialize)]
pub struct HealthResponse {
    /// Always true when the bridge can answer at all.
    pub success: bool,

    /// Service identifier.
    pub service: String,

    /// False once shutdown has been requested.
    pub accepting_requests: bool,

    /// Current queue depths and counters.
    pub queues: QueueSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepted_shape() {
        let response = SubmitResponse::accepted("element_1_0".into(), "queued for creation");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["request_id"], "element_1_0");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_rejected_shape() {
        let response = SubmitResponse::rejected("bridge is shutting down");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("request_id").is_none());
        assert_eq!(value["error"], "bridge is shutting down");
    }

    #[test]
    fn test_status_completed_with_error() {
        let response = StatusResponse::completed(
            "removal_2_0".into(),
            None,
            Some("path not found".to_string()),
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["error"], "path not found");
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_status_not_found() {
        let response = StatusResponse::not_found("element_9_0".into());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["status"], "not_found");
    }

    #[test]
    fn test_status_completed_success() {
        let response =
            StatusResponse::completed("asset_1_0".into(), Some(json!({"path": "/World/a"})), None);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["result"]["path"], "/World/a");
    }
}
