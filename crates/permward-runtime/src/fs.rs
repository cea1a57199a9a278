//! Filesystem-backed mode provider (unix).

use permward_acl::ModeProvider;
use permward_types::{FileMode, ProbeError};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Reads and sets permission bits through `std::fs`.
///
/// Symlinks are followed, like `stat(2)` and `chmod(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsModeProvider;

impl ModeProvider for FsModeProvider {
    fn read_mode(&self, path: &Path) -> Result<FileMode, ProbeError> {
        let meta = fs::metadata(path).map_err(|e| ProbeError::from_read_io(path, e))?;
        Ok(FileMode::new(meta.permissions().mode()))
    }

    fn write_mode(&self, path: &Path, mode: FileMode) -> Result<(), ProbeError> {
        fs::set_permissions(path, fs::Permissions::from_mode(mode.bits()))
            .map_err(|e| ProbeError::from_write_io(path, e))
    }
}
