//! Unix permission modes and path targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Permission bits plus setuid, setgid and sticky.
const MODE_MASK: u32 = 0o7777;

/// Owner, group and other `rwx`.
const PERM_MASK: u32 = 0o777;

/// Error parsing a [`FileMode`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid file mode '{input}': expected octal digits such as 0600")]
pub struct ModeParseError {
    input: String,
}

/// Unix permission bits of a file or directory.
///
/// Renders in zero-padded octal (`0640`), so an observed and an expected
/// mode are always shown in the same base.
///
/// ```
/// use permward_types::FileMode;
///
/// let mode = FileMode::new(0o640);
/// assert_eq!(mode.to_string(), "0640");
/// assert_eq!("0600".parse::<FileMode>(), Ok(FileMode::new(0o600)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileMode(u32);

impl FileMode {
    /// Default mode for directories: owner-only `rwx`.
    pub const DEFAULT_DIR: Self = Self(0o700);

    /// Default mode for files: owner-only `rw`.
    pub const DEFAULT_FILE: Self = Self(0o600);

    /// Creates a mode, discarding file-type bits.
    #[must_use]
    pub const fn new(bits: u32) -> Self {
        Self(bits & MODE_MASK)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns only the nine `rwx` bits, without setuid, setgid or sticky.
    ///
    /// ```
    /// use permward_types::FileMode;
    ///
    /// assert_eq!(FileMode::new(0o2700).perm(), FileMode::new(0o700));
    /// ```
    #[must_use]
    pub const fn perm(self) -> Self {
        Self(self.0 & PERM_MASK)
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl FromStr for FileMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0o")
            .or_else(|| trimmed.strip_prefix("0O"))
            .unwrap_or(trimmed);
        let err = || ModeParseError {
            input: s.to_string(),
        };

        if digits.is_empty() || digits.len() > 5 {
            return Err(err());
        }
        let bits = u32::from_str_radix(digits, 8).map_err(|_| err())?;
        if bits & !MODE_MASK != 0 {
            return Err(err());
        }
        Ok(Self(bits))
    }
}

impl TryFrom<String> for FileMode {
    type Error = ModeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FileMode> for String {
    fn from(value: FileMode) -> Self {
        value.to_string()
    }
}

/// Whether a target path is expected to be a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    File,
    Directory,
}

impl PathKind {
    /// Label used in log records (`file` / `directory`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A path together with its kind and the mode it must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSpec {
    pub path: PathBuf,
    pub kind: PathKind,
    pub expected_mode: FileMode,
}

impl PathSpec {
    /// Creates a spec.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: PathKind, expected_mode: FileMode) -> Self {
        Self {
            path: path.into(),
            kind,
            expected_mode,
        }
    }

    /// Returns the path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_zero_padded_octal() {
        assert_eq!(FileMode::new(0o600).to_string(), "0600");
        assert_eq!(FileMode::new(0o640).to_string(), "0640");
        assert_eq!(FileMode::new(0).to_string(), "0000");
        assert_eq!(FileMode::new(0o4755).to_string(), "4755");
    }

    #[test]
    fn new_strips_file_type_bits() {
        // S_IFDIR | 0755
        assert_eq!(FileMode::new(0o040_755), FileMode::new(0o755));
    }

    #[test]
    fn parse_accepts_common_spellings() {
        assert_eq!("600".parse(), Ok(FileMode::new(0o600)));
        assert_eq!("0600".parse(), Ok(FileMode::new(0o600)));
        assert_eq!("0o700".parse(), Ok(FileMode::new(0o700)));
        assert_eq!(" 0755 ".parse(), Ok(FileMode::new(0o755)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", "0o", "rw-------", "0800", "17777", "123456"] {
            assert!(input.parse::<FileMode>().is_err(), "accepted: {input:?}");
        }
    }

    #[test]
    fn perm_drops_special_bits() {
        assert_eq!(FileMode::new(0o4755).perm().bits(), 0o755);
        assert_eq!(FileMode::new(0o1777).perm().to_string(), "0777");
        assert_eq!(FileMode::DEFAULT_FILE.perm(), FileMode::DEFAULT_FILE);
    }

    #[test]
    fn defaults() {
        assert_eq!(FileMode::DEFAULT_DIR.bits(), 0o700);
        assert_eq!(FileMode::DEFAULT_FILE.bits(), 0o600);
    }

    #[test]
    fn serde_as_octal_string() {
        let json = serde_json::to_string(&FileMode::DEFAULT_FILE).expect("serialize");
        assert_eq!(json, "\"0600\"");
        let parsed: FileMode = serde_json::from_str("\"0700\"").expect("deserialize");
        assert_eq!(parsed, FileMode::DEFAULT_DIR);
    }

    #[test]
    fn path_kind_labels() {
        assert_eq!(PathKind::File.to_string(), "file");
        assert_eq!(PathKind::Directory.as_str(), "directory");
        assert_eq!(format!("{:<6}|", PathKind::File), "file  |");
    }
}
