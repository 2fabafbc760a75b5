//! Configuration file handling for ~/.stagebridge/config.ini.
//!
//! Values overlay [`Settings::default()`]: unknown keys are ignored, and an
//! invalid value falls back to its default with a logged warning rather than
//! failing the load. Only an unreadable or malformed file is an error.

use super::settings::{Settings, MIN_SERVER_PORT};
use ini::Ini;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),
}

impl Settings {
    /// Loads configuration from the default path (~/.stagebridge/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        Ok(parse_ini(&ini))
    }
}

/// Overlays INI values onto defaults.
fn parse_ini(ini: &Ini) -> Settings {
    let mut settings = Settings::default();

    if let Some(section) = ini.section(Some("bridge")) {
        if let Some(v) = parse_key(section, "bridge", "max_operations_per_cycle") {
            settings.max_operations_per_cycle = positive_or_default(
                "bridge",
                "max_operations_per_cycle",
                v,
                settings.max_operations_per_cycle,
            );
        }
        if let Some(v) = parse_key(section, "bridge", "max_completed_requests") {
            settings.max_completed_requests = positive_or_default(
                "bridge",
                "max_completed_requests",
                v,
                settings.max_completed_requests,
            );
        }
        if let Some(secs) = parse_key::<f64>(section, "bridge", "request_tracker_ttl_seconds") {
            if secs.is_finite() && secs >= 0.0 {
                // 0 disables the TTL, same as omitting the key.
                settings.request_tracker_ttl = (secs > 0.0).then(|| Duration::from_secs_f64(secs));
            } else {
                warn!(
                    value = secs,
                    "bridge.request_tracker_ttl_seconds must be non-negative, using default"
                );
            }
        }
        if let Some(secs) = parse_key::<f64>(section, "bridge", "shutdown_timeout_seconds") {
            if secs > 0.0 && secs.is_finite() {
                settings.shutdown_timeout = Duration::from_secs_f64(secs);
            } else {
                warn!(
                    value = secs,
                    "bridge.shutdown_timeout_seconds must be positive, using default"
                );
            }
        }
        if let Some(v) = parse_key(section, "bridge", "debug_mode") {
            settings.debug_mode = v;
        }
    }

    if let Some(section) = ini.section(Some("server")) {
        if let Some(port) = parse_key::<u16>(section, "server", "port") {
            if port >= MIN_SERVER_PORT {
                settings.server_port = port;
            } else {
                warn!(
                    port,
                    min = MIN_SERVER_PORT,
                    "server.port below minimum, using default"
                );
            }
        }
        if let Some(secs) = parse_key::<f64>(section, "server", "startup_delay_seconds") {
            if secs >= 0.0 && secs.is_finite() {
                settings.startup_delay = Duration::from_secs_f64(secs);
            } else {
                warn!(
                    value = secs,
                    "server.startup_delay_seconds must be non-negative, using default"
                );
            }
        }
    }

    settings
}

/// Parses one key, warning and returning `None` on an unparseable value.
fn parse_key<T: FromStr>(section: &ini::Properties, section_name: &str, key: &str) -> Option<T> {
    let raw = section.get(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(
                section = section_name,
                key,
                value = raw,
                "Unparseable config value, using default"
            );
            None
        }
    }
}

fn positive_or_default(section: &str, key: &str, value: usize, default: usize) -> usize {
    if value > 0 {
        value
    } else {
        warn!(section, key, "Value must be positive, using default");
        default
    }
}

/// Path to the config directory (~/.stagebridge).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stagebridge")
}

/// Path to the config file (~/.stagebridge/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
