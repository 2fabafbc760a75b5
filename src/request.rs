//! Core request data model.
//!
//! A [`QueuedRequest`] is one submitted unit of work: an opaque JSON payload
//! tagged with an operation [`Category`], waiting in its category queue until
//! the owning thread drains and executes it. A [`RequestOutcome`] is the
//! terminal record produced by that execution, retained for polling clients.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Opaque category-specific request data.
///
/// The bridge never inspects payloads; they pass through from the HTTP
/// boundary to the registered handler unchanged.
pub type Payload = serde_json::Value;

/// Operation categories, one FIFO queue each.
///
/// The declaration order is the drain order: a tick services categories in
/// this fixed sequence, each to exhaustion, until the shared per-tick budget
/// is spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Primitive scene element creation.
    Element,
    /// Batch creation of multiple elements under a common transform.
    Batch,
    /// Asset placement by reference.
    Asset,
    /// Transform of an existing scene object.
    Transform,
    /// Element or subtree removal.
    Removal,
    /// Camera movement.
    Camera,
}

impl Category {
    /// All categories in drain order.
    pub const ALL: [Category; 6] = [
        Category::Element,
        Category::Batch,
        Category::Asset,
        Category::Transform,
        Category::Removal,
        Category::Camera,
    ];

    /// Returns the wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Batch => "batch",
            Self::Asset => "asset",
            Self::Transform => "transform",
            Self::Removal => "removal",
            Self::Camera => "camera",
        }
    }

    /// Returns the positional index of this category within [`Category::ALL`].
    pub(crate) fn index(&self) -> usize {
        match self {
            Self::Element => 0,
            Self::Batch => 1,
            Self::Asset => 2,
            Self::Transform => 3,
            Self::Removal => 4,
            Self::Camera => 5,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category '{0}': expected element, batch, asset, transform, removal, or camera")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "element" => Ok(Self::Element),
            "batch" => Ok(Self::Batch),
            "asset" => Ok(Self::Asset),
            "transform" => Ok(Self::Transform),
            "removal" => Ok(Self::Removal),
            "camera" => Ok(Self::Camera),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

/// Unique identifier for a submitted request.
///
/// The format is `{category}_{counter}_{unix_seconds}`: the atomic counter
/// guarantees uniqueness within the process, the timestamp makes IDs
/// coarsely distinguishable across restarts. Uniqueness is the only hard
/// requirement; IDs carry no ordering contract.
#[derive(Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a request ID with the given string value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds an ID from its components.
    pub(crate) fn from_parts(category: Category, counter: u64, unix_secs: u64) -> Self {
        Self(format!("{}_{}_{}", category, counter, unix_secs))
    }

    /// Returns the string value of this request ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One submitted unit of work.
///
/// Created by a producer thread at submission, immutable afterwards, and
/// removed from its queue exactly once by the single consumer during a drain.
#[derive(Clone, Debug)]
pub struct QueuedRequest {
    /// Unique request identifier.
    pub id: RequestId,

    /// Operation category (selects the queue and the handler).
    pub category: Category,

    /// Opaque category-specific data.
    pub payload: Payload,

    /// When the request was enqueued.
    pub submitted_at: Instant,
}

impl QueuedRequest {
    /// Creates a new queued request stamped with the current time.
    pub fn new(id: RequestId, category: Category, payload: Payload) -> Self {
        Self {
            id,
            category,
            payload,
            submitted_at: Instant::now(),
        }
    }
}

/// Terminal record for an executed request.
///
/// Created by the consumer immediately after the handler returns (or
/// panics), never mutated afterwards, and eventually evicted from the
/// completed-request cache.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestOutcome {
    /// The request this outcome belongs to.
    pub request_id: RequestId,

    /// Whether the handler completed successfully.
    pub success: bool,

    /// Success payload returned by the handler (null on failure).
    pub result: Payload,

    /// Error message when the handler failed or panicked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Completion time as unix seconds.
    pub completed_unix: f64,
}

impl RequestOutcome {
    /// Creates a successful outcome.
    pub fn success(request_id: RequestId, result: Payload) -> Self {
        Self {
            request_id,
            success: true,
            result,
            error: None,
            completed_unix: unix_now(),
        }
    }

    /// Creates a failed outcome with the given error message.
    pub fn failure(request_id: RequestId, error: impl Into<String>) -> Self {
        Self {
            request_id,
            success: false,
            result: Payload::Null,
            error: Some(error.into()),
            completed_unix: unix_now(),
        }
    }
}

/// Current wall-clock time as unix seconds.
pub(crate) fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
