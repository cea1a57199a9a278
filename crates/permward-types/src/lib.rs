//! Core types for permward.
//!
//! This crate holds the vocabulary every other permward crate speaks:
//! who ([`Principal`]), what ([`AccessRight`], [`FileMode`]), the entries
//! that tie them together ([`AccessControlEntry`], [`SecurityState`]) and
//! the error taxonomy for reading/writing them ([`ProbeError`]).
//!
//! # Crate Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  permward-types   : Principal, AccessRight, SecurityState  ◄── HERE
//! ├─────────────────────────────────────────────────────────────┤
//! │  permward-acl     : classify, needs_migration, rebuild      │
//! │                     provider traits                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  permward-runtime : enforcers, orchestrator, config         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  permward-cli     : `permward` binary                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! No type here touches the filesystem. States are transient views over
//! OS-owned data, produced and consumed by providers in the layers above.

pub mod entry;
pub mod error;
pub mod mode;
pub mod principal;
pub mod rights;

pub use entry::{AccessControlEntry, SecurityState};
pub use error::{ErrorCode, ProbeError};
pub use mode::{FileMode, ModeParseError, PathKind, PathSpec};
pub use principal::{Principal, PrincipalParseError, Sid};
pub use rights::AccessRight;
