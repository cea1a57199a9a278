//! Access-list enforcer.
//!
//! Reads owner and entries through a [`SecurityDescriptorProvider`], runs
//! them through the pure decision and rebuild functions of
//! `permward-acl`, and writes the result back in one call.

use crate::enforcer::PermissionEnforcer;
use crate::report::PathOutcome;
use crate::targets::ProbeTarget;
use permward_acl::{
    needs_migration, plan_migration, violations, AclPolicy, SecurityDescriptorProvider, Violation,
};
use permward_types::{PathSpec, ProbeError, SecurityState};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Enforces the administrators-only access policy.
#[derive(Debug, Clone)]
pub struct AclEnforcer {
    provider: Arc<dyn SecurityDescriptorProvider>,
    policy: AclPolicy,
}

impl AclEnforcer {
    /// Creates an enforcer over `provider` with `policy`.
    #[must_use]
    pub fn new(provider: Arc<dyn SecurityDescriptorProvider>, policy: AclPolicy) -> Self {
        Self { provider, policy }
    }

    /// Returns the policy.
    #[must_use]
    pub fn policy(&self) -> &AclPolicy {
        &self.policy
    }

    fn read(&self, target: &PathSpec) -> Result<SecurityState, PathOutcome> {
        self.provider
            .read_state(target.path())
            .map_err(|e| read_failure(target, &e))
    }
}

fn read_failure(target: &PathSpec, err: &ProbeError) -> PathOutcome {
    if err.is_not_found() {
        debug!(kind = %target.kind, path = %target.path.display(), error = %err, "getting security info");
        PathOutcome::Missing
    } else {
        error!(kind = %target.kind, path = %target.path.display(), error = %err, "getting security info");
        PathOutcome::ReadFailed {
            error: err.to_string(),
        }
    }
}

fn log_violation(target: &PathSpec, violation: &Violation) {
    match violation {
        Violation::ForeignOwner { owner } => {
            warn!(path = %target.path.display(), sid = %owner, "owner is not in administrators group");
        }
        Violation::DisallowedGrant { principal, rights }
        | Violation::PartialAdminGrant { principal, rights } => {
            warn!(
                path = %target.path.display(),
                sid = %principal,
                mask = %rights,
                "unexpected access control entry"
            );
        }
    }
}

impl PermissionEnforcer for AclEnforcer {
    fn name(&self) -> &'static str {
        "acl"
    }

    fn probe_target(&self) -> ProbeTarget {
        ProbeTarget::WorkDir
    }

    fn check(&self, target: &PathSpec) -> PathOutcome {
        let state = match self.read(target) {
            Ok(state) => state,
            Err(outcome) => return outcome,
        };

        for entry in &state.entries {
            debug!(
                path = %target.path.display(),
                entry = entry.kind_str(),
                sid = %entry.principal(),
                mask = %entry.rights(),
                "checking entry"
            );
        }

        let found: Vec<Violation> = violations(&state, &self.policy).collect();
        if found.is_empty() {
            return PathOutcome::Compliant;
        }

        for violation in &found {
            log_violation(target, violation);
        }
        PathOutcome::Violation {
            findings: found.iter().map(ToString::to_string).collect(),
        }
    }

    fn needs_migration(&self, target: &PathSpec) -> bool {
        match self.provider.read_state(target.path()) {
            Ok(state) => needs_migration(&state, &self.policy),
            Err(e) if e.is_not_found() => {
                debug!(path = %target.path.display(), "no security info to migrate, likely a first run");
                false
            }
            Err(e) => {
                error!(path = %target.path.display(), error = %e, "getting security info");
                true
            }
        }
    }

    fn migrate(&self, target: &PathSpec) -> PathOutcome {
        let state = match self.read(target) {
            Ok(state) => state,
            Err(outcome) => return outcome,
        };

        let plan = plan_migration(&state, &self.policy);
        if !plan.changed {
            debug!(path = %target.path.display(), "security info already compliant");
            return PathOutcome::Unchanged;
        }

        if plan.owner_changed {
            info!(path = %target.path.display(), sid = %plan.state.owner, "migrating owner");
        }
        for entry in &plan.removed {
            info!(
                path = %target.path.display(),
                sid = %entry.principal(),
                mask = %entry.rights(),
                "removing access control entry"
            );
        }

        match self.provider.write_state(target.path(), &plan.state) {
            Ok(()) => {
                info!(
                    path = %target.path.display(),
                    preserved = plan.preserved,
                    removed = plan.removed.len(),
                    "migrated security info"
                );
                PathOutcome::Migrated
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %target.path.display(), error = %e, "setting security info");
                PathOutcome::Missing
            }
            Err(e) => {
                error!(
                    path = %target.path.display(),
                    error = %e,
                    "setting security info; this can leave your system vulnerable"
                );
                PathOutcome::WriteFailed {
                    error: e.to_string(),
                }
            }
        }
    }
}
