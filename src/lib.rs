//! StageBridge - cross-thread command bridge for a main-thread-owned scene graph
//!
//! This library sits between concurrent HTTP request handlers and a scene
//! graph that only one designated thread (the host simulation's frame loop)
//! may mutate. Producers queue mutation requests from any thread; once per
//! frame the owning thread drains a bounded batch and executes them against
//! the scene, and producers poll for outcomes by request ID.
//!
//! # High-Level API
//!
//! The [`bridge`] module wires everything together:
//!
//! ```ignore
//! use stagebridge::bridge::Bridge;
//! use stagebridge::config::Settings;
//! use stagebridge::dispatcher::HandlerRegistry;
//! use stagebridge::request::Category;
//!
//! // On the owning thread, during host startup:
//! let bridge = Bridge::new(Settings::load()?);
//! let mut registry = HandlerRegistry::new();
//! registry.register(Category::Element, |payload| { /* mutate the scene */ });
//! let dispatcher = bridge.dispatcher(registry);
//!
//! // Hand `bridge.api()` to the HTTP transport, then once per frame:
//! dispatcher.tick();
//! ```

pub mod bridge;
pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod metrics;
pub mod queue;
pub mod request;
pub mod shutdown;
pub mod tracker;
pub mod transport;

/// Version of the stagebridge library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
