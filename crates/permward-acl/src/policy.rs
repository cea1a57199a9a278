//! Policy constants handed to enforcers.
//!
//! Both policies are plain immutable values. Callers construct one at
//! startup (usually from configuration) and pass it by reference; there is
//! no global policy.

use permward_types::{AccessRight, FileMode, PathKind, Principal};
use serde::{Deserialize, Serialize};

/// The fixed access-list policy:
///
/// ```text
/// owner           = administrators
/// administrators  = FULL_CONTROL (exactly one allow entry)
/// everyone else   = no allow entries
/// deny entries    = preserved verbatim
/// ```
///
/// The installed principal must itself pass
/// [`Principal::is_builtin_administrators`], otherwise a migrated state
/// would fail its own check. [`AclPolicy::new`] enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclPolicy {
    administrators: Principal,
    full_control: AccessRight,
}

impl AclPolicy {
    /// Creates a policy that installs `administrators` on migration.
    ///
    /// Returns `None` if `administrators` does not denote the builtin
    /// administrators group in any encoding.
    ///
    /// # Example
    ///
    /// ```
    /// use permward_acl::AclPolicy;
    /// use permward_types::Principal;
    ///
    /// assert!(AclPolicy::new(Principal::account("BUILTIN\\Administrators")).is_some());
    /// assert!(AclPolicy::new(Principal::account("guestUser")).is_none());
    /// ```
    #[must_use]
    pub fn new(administrators: Principal) -> Option<Self> {
        administrators.is_builtin_administrators().then_some(Self {
            administrators,
            full_control: AccessRight::FULL_CONTROL,
        })
    }

    /// Principal installed as owner and granted full control on migration.
    ///
    /// Detection never compares against this value directly; it uses
    /// [`Principal::is_builtin_administrators`].
    #[must_use]
    pub fn administrators(&self) -> &Principal {
        &self.administrators
    }

    /// Mask the administrators grant must carry exactly.
    #[must_use]
    pub fn full_control(&self) -> AccessRight {
        self.full_control
    }

    /// Returns `true` if `principal` is the administrators group.
    #[must_use]
    pub fn is_administrators(&self, principal: &Principal) -> bool {
        principal.is_builtin_administrators()
    }
}

impl Default for AclPolicy {
    fn default() -> Self {
        Self {
            administrators: Principal::builtin_administrators(),
            full_control: AccessRight::FULL_CONTROL,
        }
    }
}

/// Expected Unix modes for directories and files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModePolicy {
    pub dir_mode: FileMode,
    pub file_mode: FileMode,
}

impl ModePolicy {
    /// Returns the expected mode for a path of the given kind.
    #[must_use]
    pub fn expected(&self, kind: PathKind) -> FileMode {
        match kind {
            PathKind::Directory => self.dir_mode,
            PathKind::File => self.file_mode,
        }
    }
}

impl Default for ModePolicy {
    fn default() -> Self {
        Self {
            dir_mode: FileMode::DEFAULT_DIR,
            file_mode: FileMode::DEFAULT_FILE,
        }
    }
}
