//! Boundary contract with the HTTP transport layer.
//!
//! The transport itself (sockets, routing, TLS, auth) lives outside this
//! crate. What lives here is the seam: the [`ApiFacade`] that handler
//! threads call to submit work and poll for results, the serde response
//! shapes those calls produce, and the [`TransportControl`] hook the
//! shutdown coordinator drives during teardown.

mod facade;
mod schemas;

pub use facade::ApiFacade;
pub use schemas::{HealthResponse, StatusResponse, SubmitResponse};

/// Lifecycle control the HTTP transport exposes to the bridge.
///
/// [`shutdown`](Self::shutdown) may legitimately block while an in-flight
/// connection winds down; the shutdown coordinator therefore always drives
/// it from a worker thread, never from the owning thread.
pub trait TransportControl: Send + 'static {
    /// Stops accepting connections and waits for in-flight work to finish.
    fn shutdown(&self);
}
