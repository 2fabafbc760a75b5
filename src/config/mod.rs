//! Bridge configuration.
//!
//! [`Settings`] carries every tunable the bridge exposes, loaded once at
//! construction from `~/.stagebridge/config.ini` (or any path the host
//! supplies). Loading is forgiving: a missing file, an unknown key, or an
//! out-of-range value never prevents startup.

mod file;
mod settings;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    Settings, DEFAULT_MAX_COMPLETED_REQUESTS, DEFAULT_MAX_OPERATIONS_PER_CYCLE,
    DEFAULT_SERVER_PORT, DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_STARTUP_DELAY, MIN_SERVER_PORT,
};
