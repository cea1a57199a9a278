//! The check / needs-migration / migrate contract.
//!
//! # Implementations
//!
//! | Enforcer | Model | Probe |
//! |----------|-------|-------|
//! | [`ModeEnforcer`](crate::ModeEnforcer) | Unix permission bits | configuration file |
//! | [`AclEnforcer`](crate::AclEnforcer) | owner + access list | working directory |
//!
//! Every method handles its own failures: it logs them and returns an
//! outcome. Nothing here returns `Result`, so one bad path never stops a
//! pass.

use crate::report::PathOutcome;
use crate::targets::ProbeTarget;
use permward_types::PathSpec;

/// One permission model applied to one path at a time.
pub trait PermissionEnforcer: Send + Sync + std::fmt::Debug {
    /// Short name used in reports (`mode`, `acl`).
    fn name(&self) -> &'static str;

    /// Path consulted by the orchestrator-level needs-migration probe.
    fn probe_target(&self) -> ProbeTarget;

    /// Observes `target` and logs any deviation. Never mutates.
    fn check(&self, target: &PathSpec) -> PathOutcome;

    /// Returns `true` if `target` should be migrated.
    ///
    /// Absence answers `false`; an unexpected read failure answers `true`.
    fn needs_migration(&self, target: &PathSpec) -> bool;

    /// Brings `target` in line with the policy.
    fn migrate(&self, target: &PathSpec) -> PathOutcome;
}
