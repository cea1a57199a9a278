//! Configuration management with hierarchical layering.
//!
//! # Architecture
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────────┐
//! │  1. CLI flags (ConfigResolver)               │  Per invocation
//! ├──────────────────────────────────────────────┤
//! │  2. Environment Variables (PERMWARD_*)       │  Runtime override
//! ├──────────────────────────────────────────────┤
//! │  3. Explicit Config (--config FILE)          │  Deployment-specific
//! ├──────────────────────────────────────────────┤
//! │  4. Global Config (~/.permward/config.toml)  │  User defaults
//! ├──────────────────────────────────────────────┤
//! │  5. Default Values (compile-time)            │  Fallback
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `PERMWARD_DEBUG` | `debug` | bool |
//! | `PERMWARD_WORK_DIR` | `paths.work_dir` | PathBuf |
//! | `PERMWARD_CONF_FILE` | `paths.conf_file` | PathBuf |
//! | `PERMWARD_DATA_DIR` | `paths.data_dir` | PathBuf |
//! | `PERMWARD_QUERYLOG_DIR` | `paths.querylog_dir` | PathBuf |
//! | `PERMWARD_STATS_DIR` | `paths.stats_dir` | PathBuf |
//! | `PERMWARD_DIR_MODE` | `policy.dir_mode` | octal |
//! | `PERMWARD_FILE_MODE` | `policy.file_mode` | octal |
//!
//! # Example Configuration
//!
//! ```toml
//! debug = false
//!
//! [paths]
//! work_dir = "/opt/app"
//! conf_file = "/opt/app/app.yaml"
//! data_dir = "/opt/app/data"
//!
//! [policy]
//! dir_mode = "0700"
//! file_mode = "0600"
//! administrators = "S-1-5-32-544"
//! ```

mod error;
mod loader;
mod resolver;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use resolver::{ConfigResolver, NoOpResolver};
pub use types::{PathsConfig, PermwardConfig, PolicyConfig};

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".permward")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}
