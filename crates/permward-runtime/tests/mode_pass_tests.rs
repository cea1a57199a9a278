//! Integration tests for the mode enforcer on a real directory tree.
//!
//! Tests the complete flow of:
//! - TargetPaths resolution from configuration
//! - check / needs-migration / migrate through FsModeProvider
//! - The startup sequence
#![cfg(unix)]

use permward_runtime::config::{ConfigLoader, ConfigResolver, PermwardConfig};
use permward_runtime::{
    CancelSignal, FsModeProvider, ModeEnforcer, Orchestrator, PathOutcome, TargetPaths,
};
use permward_types::FileMode;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

// =============================================================================
// Test Fixtures
// =============================================================================

fn chmod(path: &Path, mode: u32) {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("should chmod");
}

fn mode_of(path: &Path) -> u32 {
    fs::metadata(path)
        .expect("should stat")
        .permissions()
        .mode()
        & 0o7777
}

/// Lays out an install under a temp dir with loose permissions.
fn loose_install() -> (TempDir, TargetPaths) {
    let temp = TempDir::new().expect("should create temp dir");
    let targets = TargetPaths::under(temp.path().join("app"));

    fs::create_dir_all(targets.data_dir.join("filters")).expect("should create dirs");
    fs::write(&targets.conf_file, "http:\n  address: 0.0.0.0:3000\n").expect("should write conf");
    fs::write(targets.data_dir.join("sessions.db"), b"").expect("should write sessions");
    fs::write(targets.data_dir.join("stats.db"), b"").expect("should write stats");

    chmod(&targets.work_dir, 0o755);
    chmod(&targets.conf_file, 0o640);
    chmod(&targets.data_dir, 0o755);
    chmod(&targets.data_dir.join("filters"), 0o755);
    chmod(&targets.data_dir.join("sessions.db"), 0o644);
    chmod(&targets.data_dir.join("stats.db"), 0o666);

    (temp, targets)
}

fn orchestrator(targets: TargetPaths) -> Orchestrator {
    let config = PermwardConfig::default();
    Orchestrator::new(
        targets,
        config.mode_policy(),
        Arc::new(ModeEnforcer::new(Arc::new(FsModeProvider))),
    )
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn conf_file_0640_is_reported_then_fixed() {
    let (_temp, targets) = loose_install();
    let conf = targets.conf_file.clone();
    let orchestrator = orchestrator(targets);

    let report = orchestrator.check(&CancelSignal::new());
    assert_eq!(
        report.outcome_for(&conf),
        Some(&PathOutcome::Violation {
            findings: vec!["got 0640, want 0600".into()]
        })
    );
    assert_eq!(mode_of(&conf), 0o640, "check must not mutate");

    assert!(orchestrator.needs_migration());
    orchestrator.migrate(&CancelSignal::new());

    assert_eq!(mode_of(&conf), 0o600);
    assert!(!orchestrator.needs_migration());
    assert_eq!(
        orchestrator.check(&CancelSignal::new()).outcome_for(&conf),
        Some(&PathOutcome::Compliant)
    );
}

#[test]
fn startup_converges_whole_tree() {
    let (_temp, targets) = loose_install();
    let orchestrator = orchestrator(targets.clone());

    let report = orchestrator.startup(&CancelSignal::new());
    assert!(report.needed_migration);
    assert!(report.migrate.is_some());
    assert_eq!(report.check.violations(), 0);
    assert_eq!(report.check.failures(), 0);

    assert_eq!(mode_of(&targets.work_dir), 0o700);
    assert_eq!(mode_of(&targets.data_dir.join("filters")), 0o700);
    assert_eq!(mode_of(&targets.data_dir.join("stats.db")), 0o600);

    // Absent files stay absent.
    assert!(!targets.data_dir.join("leases.json").exists());
    assert_eq!(
        report
            .check
            .outcome_for(&targets.data_dir.join("leases.json")),
        Some(&PathOutcome::Missing)
    );
}

#[test]
fn fresh_install_needs_nothing() {
    let temp = TempDir::new().expect("should create temp dir");
    let orchestrator = orchestrator(TargetPaths::under(temp.path().join("absent")));

    assert!(!orchestrator.needs_migration());
    let report = orchestrator.migrate(&CancelSignal::new());
    assert!(report
        .paths
        .iter()
        .all(|p| p.outcome == PathOutcome::Missing));
}

#[test]
fn configured_modes_are_enforced() {
    let (_temp, targets) = loose_install();

    struct WorkDirOverride(std::path::PathBuf);
    impl ConfigResolver for WorkDirOverride {
        fn apply(&self, config: &mut PermwardConfig) {
            config.paths.work_dir = Some(self.0.clone());
        }
    }

    let mut config = ConfigLoader::new()
        .skip_global_config()
        .skip_env_vars()
        .load()
        .expect("should load defaults");
    config.policy.file_mode = FileMode::new(0o640);
    WorkDirOverride(targets.work_dir.clone()).apply(&mut config);

    let resolved = config.targets().expect("should resolve targets");
    assert_eq!(resolved, targets);

    let orchestrator = Orchestrator::new(
        resolved,
        config.mode_policy(),
        Arc::new(ModeEnforcer::new(Arc::new(FsModeProvider))),
    );
    assert!(!orchestrator.needs_migration(), "0640 is now expected");
}

#[test]
fn cancelled_pass_touches_nothing() {
    let (_temp, targets) = loose_install();
    let orchestrator = orchestrator(targets.clone());

    let signal = CancelSignal::new();
    signal.cancel();
    let report = orchestrator.migrate(&signal);

    assert!(report.cancelled);
    assert_eq!(mode_of(&targets.conf_file), 0o640);
}

#[test]
fn setgid_data_dir_passes_check() {
    let (_temp, targets) = loose_install();
    let orchestrator = orchestrator(targets.clone());
    orchestrator.migrate(&CancelSignal::new());

    chmod(&targets.data_dir, 0o2700);
    let report = orchestrator.check(&CancelSignal::new());
    assert_eq!(
        report.outcome_for(&targets.data_dir),
        Some(&PathOutcome::Compliant)
    );
    assert_eq!(report.violations(), 0);
}
