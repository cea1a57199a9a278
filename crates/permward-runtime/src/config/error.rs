//! Configuration errors.

use permward_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file '{path}' does not exist")]
    NotFound { path: PathBuf },

    /// Invalid environment variable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// A policy value that migration could never satisfy.
    #[error("invalid policy setting '{field}': {message}")]
    InvalidPolicy { field: &'static str, message: String },

    /// No working directory configured and the current one is unavailable.
    #[error("cannot determine working directory: {0}")]
    WorkDir(#[source] std::io::Error),
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse TOML error.
    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    /// Creates a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates an invalid policy error.
    pub fn invalid_policy(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            field,
            message: message.into(),
        }
    }

    /// Creates an invalid env var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FAILED",
            Self::ParseToml { .. } => "CONFIG_PARSE_FAILED",
            Self::NotFound { .. } => "CONFIG_NOT_FOUND",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV",
            Self::InvalidPolicy { .. } => "CONFIG_INVALID_POLICY",
            Self::WorkDir(_) => "CONFIG_NO_WORK_DIR",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
