//! Unix mode enforcer.

use crate::enforcer::PermissionEnforcer;
use crate::report::PathOutcome;
use crate::targets::ProbeTarget;
use permward_acl::ModeProvider;
use permward_types::{PathSpec, ProbeError};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Compares permission bits with the expected mode and sets them on
/// migration.
///
/// Only the nine `rwx` bits take part in the comparison; a setgid or
/// sticky bit on an otherwise private directory is not a deviation.
/// Migration writes the expected mode as configured.
#[derive(Debug, Clone)]
pub struct ModeEnforcer {
    provider: Arc<dyn ModeProvider>,
}

impl ModeEnforcer {
    /// Creates an enforcer over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn ModeProvider>) -> Self {
        Self { provider }
    }
}

fn read_failure(target: &PathSpec, err: &ProbeError, msg: &str) -> PathOutcome {
    if err.is_not_found() {
        debug!(kind = %target.kind, path = %target.path.display(), error = %err, "{msg}");
        PathOutcome::Missing
    } else {
        error!(kind = %target.kind, path = %target.path.display(), error = %err, "{msg}");
        PathOutcome::ReadFailed {
            error: err.to_string(),
        }
    }
}

impl PermissionEnforcer for ModeEnforcer {
    fn name(&self) -> &'static str {
        "mode"
    }

    fn probe_target(&self) -> ProbeTarget {
        ProbeTarget::ConfFile
    }

    fn check(&self, target: &PathSpec) -> PathOutcome {
        let got = match self.provider.read_mode(target.path()) {
            Ok(mode) => mode,
            Err(e) => return read_failure(target, &e, "checking permissions"),
        };

        let got = got.perm();
        let want = target.expected_mode.perm();
        if got == want {
            return PathOutcome::Compliant;
        }

        warn!(
            kind = %target.kind,
            path = %target.path.display(),
            got = %got,
            want = %want,
            "found unexpected permissions"
        );
        PathOutcome::Violation {
            findings: vec![format!("got {got}, want {want}")],
        }
    }

    fn needs_migration(&self, target: &PathSpec) -> bool {
        match self.provider.read_mode(target.path()) {
            Ok(mode) => mode.perm() != target.expected_mode.perm(),
            Err(e) if e.is_not_found() => {
                debug!(path = %target.path.display(), "no permissions to migrate, likely a first run");
                false
            }
            Err(e) => {
                error!(
                    path = %target.path.display(),
                    error = %e,
                    "checking a need for permission migration"
                );
                true
            }
        }
    }

    fn migrate(&self, target: &PathSpec) -> PathOutcome {
        let want = target.expected_mode;
        match self.provider.write_mode(target.path(), want) {
            Ok(()) => {
                info!(kind = %target.kind, path = %target.path.display(), "changed permissions");
                PathOutcome::Migrated
            }
            Err(e) if e.is_not_found() => {
                debug!(kind = %target.kind, path = %target.path.display(), error = %e, "checking permissions");
                PathOutcome::Missing
            }
            Err(e) => {
                error!(
                    kind = %target.kind,
                    path = %target.path.display(),
                    target_perm = %want,
                    error = %e,
                    "cannot change permissions; this can leave your system vulnerable"
                );
                PathOutcome::WriteFailed {
                    error: e.to_string(),
                }
            }
        }
    }
}
