//! Provider traits: the seam between policy and the operating system.
//!
//! Enforcers never touch the filesystem directly. They call a provider,
//! which reads or writes the permissions of one path and classifies the
//! outcome into a [`ProbeError`].
//!
//! # Implementations
//!
//! - `FsModeProvider` (in `permward-runtime`, unix only): `std::fs` modes
//! - `MemoryDescriptorStore` / `MemoryModeStore` (in `permward-runtime`)
//! - A host-supplied security descriptor binding on Windows

use permward_types::{FileMode, ProbeError, SecurityState};
use std::path::Path;

/// Reads and writes the owner and discretionary list of a path.
pub trait SecurityDescriptorProvider: Send + Sync + std::fmt::Debug {
    /// Reads owner and entries in list order.
    ///
    /// # Errors
    ///
    /// [`ProbeError::NotFound`] if the path is absent, [`ProbeError::Read`]
    /// for any other failure.
    fn read_state(&self, path: &Path) -> Result<SecurityState, ProbeError>;

    /// Writes owner and entries as one descriptor-set operation.
    ///
    /// Implementations must never store an empty discretionary list; see
    /// [`ensure_non_empty`](crate::ensure_non_empty).
    ///
    /// # Errors
    ///
    /// [`ProbeError::NotFound`] if the path is absent, [`ProbeError::Write`]
    /// for any other failure.
    fn write_state(&self, path: &Path, state: &SecurityState) -> Result<(), ProbeError>;
}

/// Reads and writes Unix permission bits of a path.
pub trait ModeProvider: Send + Sync + std::fmt::Debug {
    /// Reads the permission bits.
    ///
    /// # Errors
    ///
    /// [`ProbeError::NotFound`] if the path is absent, [`ProbeError::Read`]
    /// for any other failure.
    fn read_mode(&self, path: &Path) -> Result<FileMode, ProbeError>;

    /// Sets the permission bits.
    ///
    /// # Errors
    ///
    /// [`ProbeError::NotFound`] if the path is absent, [`ProbeError::Write`]
    /// for any other failure.
    fn write_mode(&self, path: &Path, mode: FileMode) -> Result<(), ProbeError>;
}
