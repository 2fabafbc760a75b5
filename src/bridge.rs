//! Top-level wiring facade.
//!
//! [`Bridge`] owns the shared pieces (queue manager, shutdown state) and
//! hands out the per-role views: the [`ApiFacade`] for transport threads,
//! the [`Dispatcher`] and [`ShutdownCoordinator`] for the owning thread,
//! and a [`MetricsExporter`] for whoever scrapes. Construct it once on the
//! owning thread during host startup.

use crate::config::Settings;
use crate::dispatcher::{Dispatcher, HandlerRegistry};
use crate::metrics::MetricsExporter;
use crate::queue::QueueManager;
use crate::shutdown::{ShutdownCoordinator, ShutdownState};
use crate::transport::ApiFacade;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Owns and wires the bridge components.
pub struct Bridge {
    settings: Settings,
    queue: Arc<QueueManager>,
    shutdown: Arc<ShutdownState>,
    started: Instant,
}

impl Bridge {
    /// Builds the shared state from settings.
    ///
    /// Call on the owning thread: the dispatcher and shutdown coordinator
    /// created from this bridge bind to the constructing thread.
    pub fn new(settings: Settings) -> Self {
        let shutdown = Arc::new(ShutdownState::new());
        let queue = Arc::new(QueueManager::new(
            settings.max_completed_requests,
            Arc::clone(&shutdown),
        ));

        info!(
            max_operations_per_cycle = settings.max_operations_per_cycle,
            max_completed_requests = settings.max_completed_requests,
            server_port = settings.server_port,
            "Bridge initialized"
        );

        Self {
            settings,
            queue,
            shutdown,
            started: Instant::now(),
        }
    }

    /// The settings this bridge was built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Shared queue manager handle.
    pub fn queue(&self) -> Arc<QueueManager> {
        Arc::clone(&self.queue)
    }

    /// Shared shutdown state handle.
    pub fn shutdown_state(&self) -> Arc<ShutdownState> {
        Arc::clone(&self.shutdown)
    }

    /// Facade for transport handler threads. Cheap, callable repeatedly.
    pub fn api(&self) -> ApiFacade {
        ApiFacade::new(self.queue())
    }

    /// Metrics exporter over the queue's snapshot.
    ///
    /// Uptime is measured from bridge construction, so exporters built at
    /// different times all report the same clock.
    pub fn metrics(&self) -> MetricsExporter {
        MetricsExporter::starting_at(self.queue(), self.started)
    }

    /// Builds the per-frame dispatcher with the given handlers.
    ///
    /// Must be called on the thread that will tick it; the dispatcher
    /// captures the calling thread's identity.
    pub fn dispatcher(&self, registry: HandlerRegistry) -> Dispatcher {
        Dispatcher::new(
            self.queue(),
            registry,
            self.settings.max_operations_per_cycle,
            self.settings.request_tracker_ttl,
        )
    }

    /// Builds the shutdown coordinator, bound to the calling thread.
    pub fn coordinator(&self) -> ShutdownCoordinator {
        ShutdownCoordinator::new(self.shutdown_state(), self.settings.shutdown_timeout)
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("settings", &self.settings)
            .field("queue", &self.queue)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Category, Payload};
    use serde_json::json;

    #[test]
    fn test_components_share_state() {
        let bridge = Bridge::new(Settings::default());
        let api = bridge.api();

        let accepted = api.submit("element", json!({"name": "cube"}));
        assert!(accepted.success);
        assert_eq!(bridge.queue().snapshot().total_depth(), 1);
        assert_eq!(bridge.metrics().report().requests_submitted, 1);
    }

    #[test]
    fn test_dispatcher_uses_configured_budget() {
        let settings = Settings {
            max_operations_per_cycle: 2,
            ..Settings::default()
        };
        let bridge = Bridge::new(settings);

        let mut registry = HandlerRegistry::new();
        registry.register(Category::Element, |_: &Payload| Ok(json!(null)));
        let dispatcher = bridge.dispatcher(registry);

        for _ in 0..3 {
            bridge.api().submit("element", json!({}));
        }

        let report = dispatcher.tick();
        assert_eq!(report.processed, 2);
        assert_eq!(report.remaining, 1);
    }

    #[test]
    fn test_metrics_uptime_anchored_to_construction() {
        let bridge = Bridge::new(Settings::default());
        std::thread::sleep(std::time::Duration::from_millis(20));

        // A fresh exporter still measures from bridge construction.
        let uptime = bridge.metrics().report().uptime_seconds;
        assert!(uptime >= 0.020, "uptime was {}", uptime);
    }

    #[test]
    fn test_shutdown_rejects_via_api() {
        let bridge = Bridge::new(Settings::default());
        bridge.shutdown_state().request();

        let response = bridge.api().submit("element", json!({}));
        assert!(!response.success);
    }
}
