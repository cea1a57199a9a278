//! Per-path outcomes of a permission pass.
//!
//! A [`PassReport`] is an observation record. It mirrors what was logged
//! and never changes the process exit code.

use permward_types::PathKind;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What happened to one target path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PathOutcome {
    /// Permissions match the policy.
    Compliant,
    /// Permissions deviate from the policy.
    Violation { findings: Vec<String> },
    /// The path does not exist.
    Missing,
    /// The permissions could not be read.
    ReadFailed { error: String },
    /// The permissions were written.
    Migrated,
    /// The permissions already matched; nothing was written.
    Unchanged,
    /// The permissions could not be written.
    WriteFailed { error: String },
}

impl PathOutcome {
    /// Returns `true` for [`PathOutcome::Violation`].
    #[must_use]
    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Violation { .. })
    }

    /// Returns `true` for read or write failures.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::ReadFailed { .. } | Self::WriteFailed { .. })
    }

    /// Short label used in text output.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Compliant => "ok",
            Self::Violation { .. } => "violation",
            Self::Missing => "missing",
            Self::ReadFailed { .. } => "read-failed",
            Self::Migrated => "migrated",
            Self::Unchanged => "unchanged",
            Self::WriteFailed { .. } => "write-failed",
        }
    }
}

/// Which pass produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Check,
    Migrate,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Check => "check",
            Self::Migrate => "migrate",
        })
    }
}

/// Outcome for one visited path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathReport {
    pub path: PathBuf,
    pub kind: PathKind,
    #[serde(flatten)]
    pub outcome: PathOutcome,
}

/// Outcomes of one check or migrate pass, in visiting order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub operation: Operation,
    /// Enforcer that ran the pass (`mode` or `acl`).
    pub enforcer: &'static str,
    pub paths: Vec<PathReport>,
    /// Whether the pass stopped early on a cancel signal.
    pub cancelled: bool,
}

impl PassReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(operation: Operation, enforcer: &'static str) -> Self {
        Self {
            operation,
            enforcer,
            paths: Vec::new(),
            cancelled: false,
        }
    }

    /// Number of paths that violate the policy.
    #[must_use]
    pub fn violations(&self) -> usize {
        self.paths.iter().filter(|p| p.outcome.is_violation()).count()
    }

    /// Number of paths whose permissions could not be read or written.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.paths.iter().filter(|p| p.outcome.is_failure()).count()
    }

    /// Returns the outcome recorded for `path`, if it was visited.
    #[must_use]
    pub fn outcome_for(&self, path: &std::path::Path) -> Option<&PathOutcome> {
        self.paths
            .iter()
            .find(|p| p.path == path)
            .map(|p| &p.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn report() -> PassReport {
        let mut r = PassReport::new(Operation::Check, "mode");
        r.paths.push(PathReport {
            path: PathBuf::from("/opt/app"),
            kind: PathKind::Directory,
            outcome: PathOutcome::Compliant,
        });
        r.paths.push(PathReport {
            path: PathBuf::from("/opt/app/config.yaml"),
            kind: PathKind::File,
            outcome: PathOutcome::Violation {
                findings: vec!["got 0640, want 0600".into()],
            },
        });
        r.paths.push(PathReport {
            path: PathBuf::from("/opt/app/data"),
            kind: PathKind::Directory,
            outcome: PathOutcome::ReadFailed {
                error: "denied".into(),
            },
        });
        r
    }

    #[test]
    fn counts() {
        let r = report();
        assert_eq!(r.violations(), 1);
        assert_eq!(r.failures(), 1);
        assert_eq!(
            r.outcome_for(Path::new("/opt/app")),
            Some(&PathOutcome::Compliant)
        );
        assert!(r.outcome_for(Path::new("/elsewhere")).is_none());
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_value(report()).expect("should serialize report");
        assert_eq!(json["operation"], "check");
        assert_eq!(json["enforcer"], "mode");
        assert_eq!(json["cancelled"], false);
        assert_eq!(json["paths"][0]["outcome"], "compliant");
        assert_eq!(json["paths"][1]["kind"], "file");
        assert_eq!(json["paths"][1]["findings"][0], "got 0640, want 0600");
        assert_eq!(json["paths"][2]["error"], "denied");
    }

    #[test]
    fn labels() {
        assert_eq!(PathOutcome::Missing.label(), "missing");
        assert_eq!(
            PathOutcome::WriteFailed { error: String::new() }.label(),
            "write-failed"
        );
        assert_eq!(Operation::Migrate.to_string(), "migrate");
    }
}
