//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.permward/config.toml`)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (`PERMWARD_*`)
//!
//! Each layer overrides the previous. CLI flags are applied afterwards
//! through a [`ConfigResolver`](super::ConfigResolver).

use super::{default_config_path, ConfigError, PermwardConfig};
use permward_types::FileMode;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing boolean environment variables.
macro_rules! parse_env_bool {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = parse_bool(&val)
                .ok_or_else(|| ConfigError::invalid_env_var($var, "expected bool"))?;
        }
    };
}

/// Helper macro for parsing octal mode environment variables.
macro_rules! parse_env_mode {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = val
                .parse::<FileMode>()
                .map_err(|e| ConfigError::invalid_env_var($var, e.to_string()))?;
        }
    };
}

/// Helper macro for path environment variables.
macro_rules! parse_env_path {
    ($field:expr, $var:literal) => {
        if let Some(val) = std::env::var_os($var) {
            $field = Some(PathBuf::from(val));
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use permward_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_config_file("/etc/permward.toml")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), permward_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.permward/config.toml).
    global_config_path: Option<PathBuf>,

    /// Explicit config file; must exist when set.
    config_file: Option<PathBuf>,

    /// Skip environment variable loading.
    skip_env: bool,

    /// Skip global config loading.
    skip_global: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Sets an explicit config file, layered over the global one.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read
    /// or parsed, if the explicit config file is missing, if an
    /// environment variable holds an invalid value, or if the merged
    /// policy cannot be enforced. A missing global config file is silently
    /// ignored.
    pub fn load(&self) -> Result<PermwardConfig, ConfigError> {
        let mut config = PermwardConfig::default();

        // Layer 1: Global config
        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(global_config) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "loaded global config");
                config.merge(&global_config);
            }
        }

        // Layer 2: Explicit config
        if let Some(ref path) = self.config_file {
            let explicit = load_file(path)?.ok_or_else(|| ConfigError::not_found(path))?;
            debug!(path = %path.display(), "loaded config file");
            config.merge(&explicit);
        }

        // Layer 3: Environment variables
        if !self.skip_env {
            apply_env_vars(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Loads a config file, returning None if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<PermwardConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    let config =
        PermwardConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(config))
}

/// Applies environment variable overrides.
fn apply_env_vars(config: &mut PermwardConfig) -> Result<(), ConfigError> {
    parse_env_bool!(config.debug, "PERMWARD_DEBUG");

    parse_env_path!(config.paths.work_dir, "PERMWARD_WORK_DIR");
    parse_env_path!(config.paths.conf_file, "PERMWARD_CONF_FILE");
    parse_env_path!(config.paths.data_dir, "PERMWARD_DATA_DIR");
    parse_env_path!(config.paths.querylog_dir, "PERMWARD_QUERYLOG_DIR");
    parse_env_path!(config.paths.stats_dir, "PERMWARD_STATS_DIR");

    parse_env_mode!(config.policy.dir_mode, "PERMWARD_DIR_MODE");
    parse_env_mode!(config.policy.file_mode, "PERMWARD_FILE_MODE");

    Ok(())
}

/// Parses a boolean from string.
///
/// Accepts: "true", "false", "1", "0", "yes", "no", "on", "off"
/// (case-insensitive).
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
