//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use super::ConfigError;
use crate::targets::TargetPaths;
use permward_acl::{AclPolicy, ModePolicy};
use permward_types::{FileMode, Principal};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure.
///
/// This is the unified configuration after merging all layers.
///
/// # Example
///
/// ```
/// use permward_runtime::config::PermwardConfig;
///
/// let config = PermwardConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.policy.file_mode.to_string(), "0600");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PermwardConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Target locations.
    pub paths: PathsConfig,

    /// Expected permissions.
    pub policy: PolicyConfig,
}

impl PermwardConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.paths.merge(&other.paths);
        self.policy.merge(&other.policy);
    }

    /// Resolves the five target locations, filling in derived defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::WorkDir`] if no working directory is set and
    /// the current directory cannot be determined.
    pub fn targets(&self) -> Result<TargetPaths, ConfigError> {
        self.paths.resolve()
    }

    /// Returns the expected modes.
    #[must_use]
    pub fn mode_policy(&self) -> ModePolicy {
        ModePolicy {
            dir_mode: self.policy.dir_mode,
            file_mode: self.policy.file_mode,
        }
    }

    /// Returns the access-list policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPolicy`] if `administrators` is not the
    /// builtin administrators group. Installing any other principal would
    /// leave a state that fails its own check after every migration.
    pub fn acl_policy(&self) -> Result<AclPolicy, ConfigError> {
        let administrators = &self.policy.administrators;
        AclPolicy::new(administrators.clone()).ok_or_else(|| {
            ConfigError::invalid_policy(
                "administrators",
                format!("'{administrators}' is not the builtin administrators group"),
            )
        })
    }

    /// Checks values that parse but cannot be enforced.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPolicy`] for the first offending
    /// setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.acl_policy().map(|_| ())
    }
}

/// Path configuration.
///
/// Unset locations are derived from `work_dir`:
///
/// | Field | Default |
/// |-------|---------|
/// | `work_dir` | current directory |
/// | `conf_file` | `<work_dir>/config.yaml` |
/// | `data_dir` | `<work_dir>/data` |
/// | `querylog_dir` | `data_dir` |
/// | `stats_dir` | `data_dir` |
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub work_dir: Option<PathBuf>,
    pub conf_file: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub querylog_dir: Option<PathBuf>,
    pub stats_dir: Option<PathBuf>,
}

impl PathsConfig {
    fn merge(&mut self, other: &Self) {
        if other.work_dir.is_some() {
            self.work_dir.clone_from(&other.work_dir);
        }
        if other.conf_file.is_some() {
            self.conf_file.clone_from(&other.conf_file);
        }
        if other.data_dir.is_some() {
            self.data_dir.clone_from(&other.data_dir);
        }
        if other.querylog_dir.is_some() {
            self.querylog_dir.clone_from(&other.querylog_dir);
        }
        if other.stats_dir.is_some() {
            self.stats_dir.clone_from(&other.stats_dir);
        }
    }

    fn resolve(&self) -> Result<TargetPaths, ConfigError> {
        let work_dir = match &self.work_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().map_err(ConfigError::WorkDir)?,
        };

        let mut targets = TargetPaths::under(work_dir);
        if let Some(conf_file) = &self.conf_file {
            targets.conf_file.clone_from(conf_file);
        }
        if let Some(data_dir) = &self.data_dir {
            targets.data_dir.clone_from(data_dir);
        }
        targets.querylog_dir = self
            .querylog_dir
            .clone()
            .unwrap_or_else(|| targets.data_dir.clone());
        targets.stats_dir = self
            .stats_dir
            .clone()
            .unwrap_or_else(|| targets.data_dir.clone());

        Ok(targets)
    }
}

/// Expected permissions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Mode for directories (octal string, e.g. `"0700"`).
    pub dir_mode: FileMode,

    /// Mode for files (octal string, e.g. `"0600"`).
    pub file_mode: FileMode,

    /// Principal installed as owner on migration.
    pub administrators: Principal,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            dir_mode: FileMode::DEFAULT_DIR,
            file_mode: FileMode::DEFAULT_FILE,
            administrators: Principal::builtin_administrators(),
        }
    }
}

impl PolicyConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.dir_mode != default.dir_mode {
            self.dir_mode = other.dir_mode;
        }
        if other.file_mode != default.file_mode {
            self.file_mode = other.file_mode;
        }
        if other.administrators != default.administrators {
            self.administrators = other.administrators.clone();
        }
    }
}
