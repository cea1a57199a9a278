//! Runs an enforcer over the fixed target list.
//!
//! # Pass Flow
//!
//! ```text
//! for spec in TargetPaths::specs():
//!     cancelled? ──yes──► stop, report.cancelled = true
//!         │ no
//!         ▼
//!     enforcer.check(spec) / enforcer.migrate(spec)
//!         │
//!         ▼
//!     report.paths.push(outcome)       (failures never stop the loop)
//! ```
//!
//! [`Orchestrator::startup`] is the boot sequence a host runs once per
//! process: needs-migration probe, migrate if needed, then check.

use crate::cancel::CancelSignal;
use crate::enforcer::PermissionEnforcer;
use crate::report::{Operation, PassReport, PathOutcome, PathReport};
use crate::targets::TargetPaths;
use permward_acl::ModePolicy;
use permward_types::PathSpec;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Reports from one [`Orchestrator::startup`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartupReport {
    /// Answer of the needs-migration probe.
    pub needed_migration: bool,
    /// Migrate pass, if one ran.
    pub migrate: Option<PassReport>,
    /// Check pass that followed.
    pub check: PassReport,
}

/// Applies one enforcer to every target path.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    targets: TargetPaths,
    modes: ModePolicy,
    enforcer: Arc<dyn PermissionEnforcer>,
}

impl Orchestrator {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(targets: TargetPaths, modes: ModePolicy, enforcer: Arc<dyn PermissionEnforcer>) -> Self {
        Self {
            targets,
            modes,
            enforcer,
        }
    }

    /// Returns the target locations.
    #[must_use]
    pub fn targets(&self) -> &TargetPaths {
        &self.targets
    }

    /// Returns the ordered list of paths a pass visits.
    #[must_use]
    pub fn specs(&self) -> Vec<PathSpec> {
        self.targets.specs(&self.modes)
    }

    /// Observes every target. Never mutates.
    pub fn check(&self, cancel: &CancelSignal) -> PassReport {
        self.run(Operation::Check, cancel)
    }

    /// Migrates every target.
    pub fn migrate(&self, cancel: &CancelSignal) -> PassReport {
        self.run(Operation::Migrate, cancel)
    }

    /// Probes the enforcer's representative path.
    #[must_use]
    pub fn needs_migration(&self) -> bool {
        let probe = self.targets.probe(self.enforcer.probe_target(), &self.modes);
        let needed = self.enforcer.needs_migration(&probe);
        debug!(
            enforcer = self.enforcer.name(),
            path = %probe.path().display(),
            needed,
            "checked need for permission migration"
        );
        needed
    }

    /// Migrates if the probe says so, then checks.
    pub fn startup(&self, cancel: &CancelSignal) -> StartupReport {
        let needed_migration = self.needs_migration();
        let migrate = if needed_migration {
            info!(enforcer = self.enforcer.name(), "migrating permissions");
            Some(self.migrate(cancel))
        } else {
            None
        };

        StartupReport {
            needed_migration,
            migrate,
            check: self.check(cancel),
        }
    }

    fn run(&self, operation: Operation, cancel: &CancelSignal) -> PassReport {
        let specs = self.specs();
        let mut report = PassReport::new(operation, self.enforcer.name());

        for (visited, spec) in specs.iter().enumerate() {
            if cancel.is_cancelled() {
                info!(
                    operation = %operation,
                    remaining = specs.len() - visited,
                    "permission pass cancelled"
                );
                report.cancelled = true;
                break;
            }

            let outcome: PathOutcome = match operation {
                Operation::Check => self.enforcer.check(spec),
                Operation::Migrate => self.enforcer.migrate(spec),
            };
            report.paths.push(PathReport {
                path: spec.path.clone(),
                kind: spec.kind,
                outcome,
            });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryModeStore;
    use crate::mode::ModeEnforcer;
    use permward_types::FileMode;
    use std::path::Path;

    /// Cancels its signal after a fixed number of visits.
    #[derive(Debug)]
    struct CancelAfter {
        inner: ModeEnforcer,
        signal: CancelSignal,
        after: usize,
        seen: parking_lot::Mutex<usize>,
    }

    impl PermissionEnforcer for CancelAfter {
        fn name(&self) -> &'static str {
            "cancel-after"
        }

        fn probe_target(&self) -> crate::targets::ProbeTarget {
            self.inner.probe_target()
        }

        fn check(&self, target: &PathSpec) -> PathOutcome {
            let mut seen = self.seen.lock();
            *seen += 1;
            if *seen == self.after {
                self.signal.cancel();
            }
            self.inner.check(target)
        }

        fn needs_migration(&self, target: &PathSpec) -> bool {
            self.inner.needs_migration(target)
        }

        fn migrate(&self, target: &PathSpec) -> PathOutcome {
            self.inner.migrate(target)
        }
    }

    fn mode_setup() -> (Arc<MemoryModeStore>, Orchestrator) {
        let store = Arc::new(MemoryModeStore::new());
        let enforcer = Arc::new(ModeEnforcer::new(store.clone()));
        let orchestrator = Orchestrator::new(
            TargetPaths::under("/opt/app"),
            ModePolicy::default(),
            enforcer,
        );
        (store, orchestrator)
    }

    #[test]
    fn check_visits_every_target_even_when_absent() {
        let (_store, orchestrator) = mode_setup();
        let report = orchestrator.check(&CancelSignal::new());

        assert_eq!(report.paths.len(), 9);
        assert!(!report.cancelled);
        assert!(report.paths.iter().all(|p| p.outcome == PathOutcome::Missing));
    }

    #[test]
    fn failure_on_one_path_does_not_stop_others() {
        let (store, orchestrator) = mode_setup();
        for spec in orchestrator.specs() {
            store.insert(&spec.path, FileMode::new(0o777));
        }
        store.fail_writes("/opt/app/config.yaml");

        let report = orchestrator.migrate(&CancelSignal::new());
        assert_eq!(report.failures(), 1);
        assert_eq!(
            store.get(Path::new("/opt/app/data/stats.db")),
            Some(FileMode::DEFAULT_FILE)
        );
        assert_eq!(store.get(Path::new("/opt/app")), Some(FileMode::DEFAULT_DIR));
    }

    #[test]
    fn pre_cancelled_signal_visits_nothing() {
        let (store, orchestrator) = mode_setup();
        store.insert("/opt/app", FileMode::new(0o777));

        let signal = CancelSignal::new();
        signal.cancel();
        let report = orchestrator.migrate(&signal);

        assert!(report.cancelled);
        assert!(report.paths.is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn cancel_mid_pass_finishes_current_path_only() {
        let store = Arc::new(MemoryModeStore::new());
        let signal = CancelSignal::new();
        let enforcer = Arc::new(CancelAfter {
            inner: ModeEnforcer::new(store.clone()),
            signal: signal.clone(),
            after: 3,
            seen: parking_lot::Mutex::new(0),
        });
        let orchestrator =
            Orchestrator::new(TargetPaths::under("/opt/app"), ModePolicy::default(), enforcer);

        let report = orchestrator.check(&signal);
        assert!(report.cancelled);
        assert_eq!(report.paths.len(), 3);
        assert_eq!(report.enforcer, "cancel-after");
    }

    #[test]
    fn needs_migration_probes_conf_file() {
        let (store, orchestrator) = mode_setup();
        store.insert("/opt/app", FileMode::new(0o777));
        assert!(!orchestrator.needs_migration(), "conf file absent");

        store.insert("/opt/app/config.yaml", FileMode::new(0o640));
        assert!(orchestrator.needs_migration());
    }

    #[test]
    fn startup_migrates_then_checks() {
        let (store, orchestrator) = mode_setup();
        store.insert("/opt/app", FileMode::new(0o755));
        store.insert("/opt/app/config.yaml", FileMode::new(0o640));

        let report = orchestrator.startup(&CancelSignal::new());
        assert!(report.needed_migration);
        let migrate = report.migrate.expect("migrate pass should run");
        assert_eq!(
            migrate.outcome_for(Path::new("/opt/app/config.yaml")),
            Some(&PathOutcome::Migrated)
        );
        assert_eq!(report.check.violations(), 0);
        assert_eq!(
            report.check.outcome_for(Path::new("/opt/app")),
            Some(&PathOutcome::Compliant)
        );
    }

    #[test]
    fn startup_skips_migration_when_compliant() {
        let (store, orchestrator) = mode_setup();
        store.insert("/opt/app/config.yaml", FileMode::new(0o600));
        store.insert("/opt/app", FileMode::new(0o755));

        let report = orchestrator.startup(&CancelSignal::new());
        assert!(!report.needed_migration);
        assert!(report.migrate.is_none());
        // The probe only looks at the config file; check still reports the rest.
        assert_eq!(report.check.violations(), 1);
        assert_eq!(store.writes(), 0);
    }
}
