//! permward CLI - filesystem permission check and migration
//!
//! # Configuration
//!
//! Configuration is loaded from multiple sources with priority:
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`PERMWARD_*`)
//! 3. Explicit config file (`--config`)
//! 4. Global config (`~/.permward/config.toml`)
//! 5. Default values (lowest priority)
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `check` | Report deviations, change nothing |
//! | `migrate` | Set every target to the expected permissions |
//! | `needs-migration` | Print whether a migration is due |
//! | `startup` | `needs-migration`, `migrate` if due, then `check` |
//!
//! The exit status is zero whenever a pass ran, whatever it found.
//! Only argument and configuration errors fail the process.

mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use permward_runtime::config::{ConfigError, ConfigLoader, ConfigResolver, PermwardConfig};
use permward_runtime::{CancelSignal, Orchestrator, PermissionEnforcer};
use permward_types::ErrorCode;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// permward - keep an application's on-disk state private
#[derive(Parser, Debug)]
#[command(name = "permward")]
#[command(version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file layered over the global one
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Working directory of the application
    #[arg(short, long, value_name = "DIR", global = true)]
    work_dir: Option<PathBuf>,

    /// Application configuration file (default: <work-dir>/config.yaml)
    #[arg(long, value_name = "FILE", global = true)]
    conf_file: Option<PathBuf>,

    /// Data directory (default: <work-dir>/data)
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Query log directory (default: data directory)
    #[arg(long, value_name = "DIR", global = true)]
    querylog_dir: Option<PathBuf>,

    /// Statistics directory (default: data directory)
    #[arg(long, value_name = "DIR", global = true)]
    stats_dir: Option<PathBuf>,

    /// Stop starting new paths after this many seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Report permission deviations without changing anything
    Check,
    /// Set every target path to the expected permissions
    Migrate,
    /// Print whether a migration is due
    NeedsMigration,
    /// Migrate if due, then check
    Startup,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// CLI-based configuration resolver.
///
/// Merges file/env config via [`ConfigLoader`] and applies CLI argument
/// overrides as the highest-priority layer.
struct CliConfigResolver {
    config_file: Option<PathBuf>,
    debug: bool,
    work_dir: Option<PathBuf>,
    conf_file: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    querylog_dir: Option<PathBuf>,
    stats_dir: Option<PathBuf>,
}

impl CliConfigResolver {
    fn from_args(args: &Args) -> Self {
        Self {
            config_file: args.config.clone(),
            debug: args.debug,
            work_dir: args.work_dir.clone(),
            conf_file: args.conf_file.clone(),
            data_dir: args.data_dir.clone(),
            querylog_dir: args.querylog_dir.clone(),
            stats_dir: args.stats_dir.clone(),
        }
    }

    /// Loads file/env layers and applies CLI overrides.
    fn resolve(&self) -> Result<PermwardConfig, ConfigError> {
        self.resolve_with(ConfigLoader::new())
    }

    fn resolve_with(&self, mut loader: ConfigLoader) -> Result<PermwardConfig, ConfigError> {
        if let Some(ref path) = self.config_file {
            loader = loader.with_config_file(path);
        }
        let mut config = loader.load()?;
        self.apply(&mut config);
        Ok(config)
    }
}

impl ConfigResolver for CliConfigResolver {
    fn apply(&self, config: &mut PermwardConfig) {
        if self.debug {
            config.debug = true;
        }
        if let Some(ref p) = self.work_dir {
            config.paths.work_dir = Some(p.clone());
        }
        if let Some(ref p) = self.conf_file {
            config.paths.conf_file = Some(p.clone());
        }
        if let Some(ref p) = self.data_dir {
            config.paths.data_dir = Some(p.clone());
        }
        if let Some(ref p) = self.querylog_dir {
            config.paths.querylog_dir = Some(p.clone());
        }
        if let Some(ref p) = self.stats_dir {
            config.paths.stats_dir = Some(p.clone());
        }
    }
}

/// Terminal filter: --debug > --verbose > RUST_LOG env > default "info".
fn terminal_filter(debug: bool, verbose: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Builds the pass deadline from `--timeout`.
fn cancel_signal(timeout: Option<u64>) -> CancelSignal {
    match timeout {
        Some(secs) => CancelSignal::with_timeout(Duration::from_secs(secs)),
        None => CancelSignal::new(),
    }
}

/// Picks the enforcer for the platform this binary was built for.
#[cfg(unix)]
fn platform_enforcer(_config: &PermwardConfig) -> Result<Arc<dyn PermissionEnforcer>> {
    use permward_runtime::{FsModeProvider, ModeEnforcer};

    Ok(Arc::new(ModeEnforcer::new(Arc::new(FsModeProvider))))
}

#[cfg(not(unix))]
fn platform_enforcer(_config: &PermwardConfig) -> Result<Arc<dyn PermissionEnforcer>> {
    anyhow::bail!(
        "no security descriptor provider is available on this platform; \
         embed permward-runtime and pass one to AclEnforcer"
    )
}

fn main() -> Result<()> {
    let args = Args::parse();
    let resolver = CliConfigResolver::from_args(&args);

    let config = resolver
        .resolve()
        .map_err(|e| anyhow::anyhow!("Config error [{}]: {e}", e.code()))?;

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_filter(terminal_filter(config.debug, args.verbose)),
        )
        .init();

    let targets = config
        .targets()
        .map_err(|e| anyhow::anyhow!("Config error [{}]: {e}", e.code()))?;
    debug!(
        work_dir = %targets.work_dir.display(),
        conf_file = %targets.conf_file.display(),
        data_dir = %targets.data_dir.display(),
        querylog_dir = %targets.querylog_dir.display(),
        stats_dir = %targets.stats_dir.display(),
        "resolved target paths"
    );

    let enforcer = platform_enforcer(&config)?;
    let orchestrator = Orchestrator::new(targets, config.mode_policy(), enforcer);

    let cancel = cancel_signal(args.timeout);

    let rendered = match args.command {
        Command::Check => output::pass(&orchestrator.check(&cancel), args.format)?,
        Command::Migrate => output::pass(&orchestrator.migrate(&cancel), args.format)?,
        Command::NeedsMigration => {
            output::needs_migration(orchestrator.needs_migration(), args.format)?
        }
        Command::Startup => output::startup(&orchestrator.startup(&cancel), args.format)?,
    };
    println!("{rendered}");

    Ok(())
}
