//! Error types shared across permward crates.
//!
//! [`ProbeError`] is what a provider returns when it reads or writes the
//! permissions of one path. It encodes the error taxonomy every enforcer
//! reacts to:
//!
//! | Variant | Meaning | Log level |
//! |---------|---------|-----------|
//! | [`NotFound`](ProbeError::NotFound) | Path is absent | debug |
//! | [`Read`](ProbeError::Read) | Mode/descriptor unreadable | error |
//! | [`Write`](ProbeError::Write) | Mode/descriptor not set | error |
//!
//! A policy violation is not an error and has no variant here.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Machine-readable error codes.
///
/// # Example
///
/// ```
/// use permward_types::{ErrorCode, ProbeError};
///
/// let err = ProbeError::not_found("/opt/app/data", std::io::ErrorKind::NotFound.into());
/// assert_eq!(err.code(), "PERM_NOT_FOUND");
/// assert!(!err.is_recoverable());
/// ```
pub trait ErrorCode {
    /// Stable `UPPER_SNAKE_CASE` code.
    fn code(&self) -> &'static str;

    /// Returns `true` if a later invocation may succeed without user action.
    fn is_recoverable(&self) -> bool;
}

/// Failure to read or write the permissions of one path.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The path does not exist.
    #[error("path not found: {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The permissions could not be read.
    #[error("reading permissions of {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The permissions could not be written.
    #[error("setting permissions of {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ProbeError {
    /// Creates a not-found error.
    pub fn not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::NotFound {
            path: path.into(),
            source,
        }
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Classifies a read-side I/O error: `NotFound` kind maps to
    /// [`ProbeError::NotFound`], everything else to [`ProbeError::Read`].
    pub fn from_read_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::not_found(path, source)
        } else {
            Self::read(path, source)
        }
    }

    /// Classifies a write-side I/O error: `NotFound` kind maps to
    /// [`ProbeError::NotFound`], everything else to [`ProbeError::Write`].
    pub fn from_write_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::not_found(path, source)
        } else {
            Self::write(path, source)
        }
    }

    /// Returns `true` if the path was absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path, .. } | Self::Read { path, .. } | Self::Write { path, .. } => {
                path
            }
        }
    }
}

impl ErrorCode for ProbeError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "PERM_NOT_FOUND",
            Self::Read { .. } => "PERM_READ_FAILED",
            Self::Write { .. } => "PERM_WRITE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        // Read/write failures are usually transient (locks, AV scanners) and
        // the next process start retries them.
        matches!(self, Self::Read { .. } | Self::Write { .. })
    }
}
