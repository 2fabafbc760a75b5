//! Settings struct and default values.

use std::time::Duration;

/// Default per-tick execution budget.
pub const DEFAULT_MAX_OPERATIONS_PER_CYCLE: usize = 5;

/// Default completed-request cache capacity.
pub const DEFAULT_MAX_COMPLETED_REQUESTS: usize = 100;

/// Default bounded wait for the transport to stop during shutdown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Default HTTP listen port.
pub const DEFAULT_SERVER_PORT: u16 = 8899;

/// Default delay before the transport starts accepting connections,
/// giving the host a frame or two to finish its own startup.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_millis(100);

/// Lowest port accepted from configuration; below this is privileged.
pub const MIN_SERVER_PORT: u16 = 1024;

/// Runtime configuration for the bridge.
///
/// Every field has a working default; a missing or partial config file is
/// never an error.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// Requests executed per tick across all categories combined.
    pub max_operations_per_cycle: usize,

    /// Completed outcomes retained for status polling.
    pub max_completed_requests: usize,

    /// Age-based eviction for completed outcomes; `None` disables it.
    pub request_tracker_ttl: Option<Duration>,

    /// How long shutdown waits for the transport before forcing completion.
    pub shutdown_timeout: Duration,

    /// Port the HTTP transport listens on.
    pub server_port: u16,

    /// Delay before the transport starts accepting connections.
    pub startup_delay: Duration,

    /// Enables verbose diagnostics in handlers and the transport.
    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_operations_per_cycle: DEFAULT_MAX_OPERATIONS_PER_CYCLE,
            max_completed_requests: DEFAULT_MAX_COMPLETED_REQUESTS,
            request_tracker_ttl: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            server_port: DEFAULT_SERVER_PORT,
            startup_delay: DEFAULT_STARTUP_DELAY,
            debug_mode: false,
        }
    }
}
