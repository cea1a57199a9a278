//! Rebuilding a compliant entry set.
//!
//! [`plan_migration`] is pure: it computes the state to write and whether a
//! write is needed at all. Committing the plan is one descriptor-set call
//! made by the enforcer.
//!
//! Output order is fixed:
//!
//! ```text
//! [ preserved entries, original order ] ++ [ Allow(owner, FULL_CONTROL) ]
//! ```

use crate::classify::{classify, EntryClass};
use crate::AclPolicy;
use permward_types::{AccessControlEntry, AccessRight, SecurityState};

/// Result of [`plan_migration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    /// State to write. Equal to the input when `changed` is `false`.
    pub state: SecurityState,
    /// Whether a write is needed.
    pub changed: bool,
    /// Whether the owner was replaced with the administrators principal.
    pub owner_changed: bool,
    /// Grants dropped because their principal is not administrators.
    pub removed: Vec<AccessControlEntry>,
    /// Number of entries copied through verbatim.
    pub preserved: usize,
}

/// Computes the compliant form of `state`.
///
/// Deny and unrecognized entries are copied through in order. Grants to
/// anyone but administrators are dropped. Existing administrators grants
/// are never copied; the result carries exactly one, synthesized with
/// `policy.full_control()`, appended last.
///
/// When the owner is already administrators and the only entries are
/// administrators grants with full control (or there are none), nothing
/// changes and the input is returned as is.
#[must_use]
pub fn plan_migration(state: &SecurityState, policy: &AclPolicy) -> MigrationPlan {
    let owner_changed = !policy.is_administrators(&state.owner);
    let owner = if owner_changed {
        policy.administrators().clone()
    } else {
        state.owner.clone()
    };

    let mut rewrite = owner_changed;
    let mut entries = Vec::with_capacity(state.entries.len() + 1);
    let mut removed = Vec::new();

    for entry in &state.entries {
        match classify(entry, policy) {
            EntryClass::Preserve => {
                entries.push(entry.clone());
                rewrite = true;
            }
            EntryClass::Disallow => {
                removed.push(entry.clone());
                rewrite = true;
            }
            EntryClass::AdminGrant(rights) => {
                if rights != policy.full_control() {
                    rewrite = true;
                }
            }
        }
    }

    if !rewrite {
        return MigrationPlan {
            state: state.clone(),
            changed: false,
            owner_changed: false,
            removed,
            preserved: 0,
        };
    }

    let preserved = entries.len();
    entries.push(AccessControlEntry::allow(owner.clone(), policy.full_control()));

    MigrationPlan {
        state: SecurityState::new(owner, entries),
        changed: true,
        owner_changed,
        removed,
        preserved,
    }
}

/// Guarantees a non-empty discretionary list before a descriptor is written.
///
/// An empty list denies everyone, the owner included, so writers substitute
/// a single full-control grant for the owner.
pub fn ensure_non_empty(state: &mut SecurityState, full_control: AccessRight) {
    if state.entries.is_empty() {
        state
            .entries
            .push(AccessControlEntry::allow(state.owner.clone(), full_control));
    }
}
