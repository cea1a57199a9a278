//! Report rendering for stdout.

use crate::Format;
use permward_runtime::{PassReport, PathOutcome, StartupReport};

/// Renders one pass.
pub fn pass(report: &PassReport, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Text => Ok(pass_text(report)),
        Format::Json => serde_json::to_string_pretty(report),
    }
}

/// Renders a needs-migration answer.
pub fn needs_migration(needed: bool, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Text => Ok(needed.to_string()),
        Format::Json => serde_json::to_string_pretty(&serde_json::json!({
            "needs_migration": needed,
        })),
    }
}

/// Renders a startup run: the migrate pass (if any), then the check pass.
pub fn startup(report: &StartupReport, format: Format) -> serde_json::Result<String> {
    match format {
        Format::Text => {
            let mut out = String::new();
            match report.migrate {
                Some(ref migrate) => {
                    out.push_str(&pass_text(migrate));
                    out.push('\n');
                }
                None => out.push_str("migration not needed\n"),
            }
            out.push_str(&pass_text(&report.check));
            Ok(out)
        }
        Format::Json => serde_json::to_string_pretty(report),
    }
}

fn pass_text(report: &PassReport) -> String {
    let mut out = String::new();
    for entry in &report.paths {
        out.push_str(&format!(
            "{:<12} {:<9} {}\n",
            entry.outcome.label(),
            entry.kind,
            entry.path.display()
        ));
        match &entry.outcome {
            PathOutcome::Violation { findings } => {
                for finding in findings {
                    out.push_str(&detail(finding));
                }
            }
            PathOutcome::ReadFailed { error } | PathOutcome::WriteFailed { error } => {
                out.push_str(&detail(error));
            }
            _ => {}
        }
    }

    out.push_str(&format!(
        "{} ({}): {} path(s), {} violation(s), {} failure(s)",
        report.operation,
        report.enforcer,
        report.paths.len(),
        report.violations(),
        report.failures()
    ));
    if report.cancelled {
        out.push_str(", cancelled");
    }
    out
}

/// Indented line under a path entry.
fn detail(text: &str) -> String {
    format!("{:<12} {:<9}   {text}\n", "", "")
}
