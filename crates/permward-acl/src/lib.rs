//! Access-list reconciliation for permward.
//!
//! Given the owner and discretionary access list of a filesystem object,
//! this crate decides whether it deviates from the fixed policy and
//! computes the corrected list. Everything here is pure; reading and
//! writing live behind the [`provider`] traits.
//!
//! # Pipeline
//!
//! ```text
//! SecurityState ──► classify (per entry) ──► needs_migration ──► plan_migration
//!                                                                   │
//!                                              MigrationPlan { state, changed }
//! ```
//!
//! # Policy
//!
//! | Entry | Treatment |
//! |-------|-----------|
//! | Deny, any principal | Preserved verbatim, in order |
//! | Unrecognized kind | Preserved verbatim, in order |
//! | Allow, non-administrators | Removed |
//! | Allow, administrators | Replaced by one `FULL_CONTROL` grant, last |
//!
//! The owner must be the administrators group.

pub mod classify;
pub mod decision;
pub mod policy;
pub mod provider;
pub mod rebuild;

pub use classify::{classify, EntryClass};
pub use decision::{needs_migration, violations, Violation};
pub use policy::{AclPolicy, ModePolicy};
pub use provider::{ModeProvider, SecurityDescriptorProvider};
pub use rebuild::{ensure_non_empty, plan_migration, MigrationPlan};
