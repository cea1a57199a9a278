//! permward runtime: enforcers, orchestration and configuration.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  permward-types / permward-acl                              │
//! │  (pure: data model, classification, rebuild, provider traits)│
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Runtime Layer (THIS CRATE)                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  enforcer     : PermissionEnforcer contract                 │
//! │  mode / acl   : ModeEnforcer, AclEnforcer                   │
//! │  fs / memory  : FsModeProvider, in-memory stores            │
//! │  orchestrator : target list, passes, startup sequence       │
//! │  config/      : PermwardConfig, ConfigLoader                │
//! └─────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Frontend Layer                             │
//! │  (permward-cli)                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`enforcer`] - The Contract
//!
//! [`PermissionEnforcer`] has two implementations, one per permission
//! model. The binary picks one per target platform.
//!
//! ## [`orchestrator`] - Passes
//!
//! - [`Orchestrator`]: runs `check` / `migrate` over [`TargetPaths`]
//! - [`PassReport`]: per-path [`PathOutcome`]s
//! - [`CancelSignal`]: stops a pass between paths
//!
//! ## [`config`] - Configuration Management
//!
//! Layered TOML + environment configuration, see the module docs.
//!
//! # Logging
//!
//! Every enforcer logs through `tracing`:
//!
//! | Event | Level |
//! |-------|-------|
//! | Path absent | debug |
//! | Violation found | warn |
//! | Permissions changed | info |
//! | Read/write failure | error |

pub mod acl;
pub mod cancel;
pub mod config;
pub mod enforcer;
#[cfg(unix)]
pub mod fs;
#[cfg(test)]
mod log_capture;
pub mod memory;
pub mod mode;
pub mod orchestrator;
pub mod report;
pub mod targets;

pub use acl::AclEnforcer;
pub use cancel::CancelSignal;
pub use enforcer::PermissionEnforcer;
#[cfg(unix)]
pub use fs::FsModeProvider;
pub use memory::{MemoryDescriptorStore, MemoryModeStore};
pub use mode::ModeEnforcer;
pub use orchestrator::{Orchestrator, StartupReport};
pub use report::{Operation, PassReport, PathOutcome, PathReport};
pub use targets::{ProbeTarget, TargetPaths};
