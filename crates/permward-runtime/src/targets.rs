//! The fixed list of paths a pass visits.
//!
//! ```text
//!  #  path                            kind
//!  1  work_dir                        directory
//!  2  conf_file                       file
//!  3  data_dir                        directory
//!  4  data_dir/filters                directory
//!  5  data_dir/sessions.db            file
//!  6  data_dir/leases.json            file
//!  7  querylog_dir                    directory  (skipped if == data_dir)
//!  8  querylog_dir/querylog.json      file
//!  9  querylog_dir/querylog.json.1    file
//! 10  stats_dir                       directory  (skipped if == data_dir)
//! 11  stats_dir/stats.db              file
//! ```

use permward_acl::ModePolicy;
use permward_types::{PathKind, PathSpec};
use serde::Serialize;
use std::path::PathBuf;

/// Representative path consulted by an orchestrator-level
/// needs-migration probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    WorkDir,
    ConfFile,
}

/// The five logical locations every target is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetPaths {
    pub work_dir: PathBuf,
    pub conf_file: PathBuf,
    pub data_dir: PathBuf,
    pub querylog_dir: PathBuf,
    pub stats_dir: PathBuf,
}

impl TargetPaths {
    /// Lays out the default tree under `work_dir`: data, query log and
    /// statistics all in `work_dir/data`, configuration in
    /// `work_dir/config.yaml`.
    #[must_use]
    pub fn under(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        let data_dir = work_dir.join("data");
        Self {
            conf_file: work_dir.join("config.yaml"),
            querylog_dir: data_dir.clone(),
            stats_dir: data_dir.clone(),
            data_dir,
            work_dir,
        }
    }

    /// Builds the ordered target list with modes taken from `policy`.
    ///
    /// Query log and statistics directories equal to the data directory
    /// are visited once, as the data directory.
    #[must_use]
    pub fn specs(&self, policy: &ModePolicy) -> Vec<PathSpec> {
        let dir = |path: PathBuf| spec(path, PathKind::Directory, policy);
        let file = |path: PathBuf| spec(path, PathKind::File, policy);

        let mut specs = Vec::with_capacity(11);
        specs.push(dir(self.work_dir.clone()));
        specs.push(file(self.conf_file.clone()));

        specs.push(dir(self.data_dir.clone()));
        specs.push(dir(self.data_dir.join("filters")));
        specs.push(file(self.data_dir.join("sessions.db")));
        specs.push(file(self.data_dir.join("leases.json")));

        if self.querylog_dir != self.data_dir {
            specs.push(dir(self.querylog_dir.clone()));
        }
        specs.push(file(self.querylog_dir.join("querylog.json")));
        specs.push(file(self.querylog_dir.join("querylog.json.1")));

        if self.stats_dir != self.data_dir {
            specs.push(dir(self.stats_dir.clone()));
        }
        specs.push(file(self.stats_dir.join("stats.db")));

        specs
    }

    /// Returns the spec for a needs-migration probe.
    #[must_use]
    pub fn probe(&self, target: ProbeTarget, policy: &ModePolicy) -> PathSpec {
        match target {
            ProbeTarget::WorkDir => spec(self.work_dir.clone(), PathKind::Directory, policy),
            ProbeTarget::ConfFile => spec(self.conf_file.clone(), PathKind::File, policy),
        }
    }
}

fn spec(path: PathBuf, kind: PathKind, policy: &ModePolicy) -> PathSpec {
    PathSpec::new(path, kind, policy.expected(kind))
}
