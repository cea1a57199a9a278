//! Policy violations and the needs-migration decision.
//!
//! Only the state-level rules live here (owner, entries). How an
//! unreadable or missing path is answered is the enforcer's business,
//! since that depends on *why* no state could be read.

use crate::classify::{classify, EntryClass};
use crate::AclPolicy;
use permward_types::{AccessRight, Principal, SecurityState};
use std::fmt;

/// One observed deviation from [`AclPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The object is owned by someone other than administrators.
    ForeignOwner { owner: Principal },
    /// A non-administrators principal holds an allow entry.
    DisallowedGrant {
        principal: Principal,
        rights: AccessRight,
    },
    /// Administrators hold an allow entry whose mask is not full control.
    PartialAdminGrant {
        principal: Principal,
        rights: AccessRight,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignOwner { owner } => {
                write!(f, "owner {owner} is not in the administrators group")
            }
            Self::DisallowedGrant { principal, rights } => {
                write!(f, "{principal} is granted {rights}")
            }
            Self::PartialAdminGrant { principal, rights } => {
                write!(f, "{principal} is granted {rights} instead of full control")
            }
        }
    }
}

/// Walks `state` and yields every violation, owner first, then entries in
/// list order.
pub fn violations<'a>(
    state: &'a SecurityState,
    policy: &'a AclPolicy,
) -> impl Iterator<Item = Violation> + 'a {
    let owner = (!policy.is_administrators(&state.owner)).then(|| Violation::ForeignOwner {
        owner: state.owner.clone(),
    });

    let entries = state
        .entries
        .iter()
        .filter_map(move |entry| match classify(entry, policy) {
            EntryClass::Preserve => None,
            EntryClass::Disallow => Some(Violation::DisallowedGrant {
                principal: entry.principal().clone(),
                rights: entry.rights(),
            }),
            EntryClass::AdminGrant(rights) if rights != policy.full_control() => {
                Some(Violation::PartialAdminGrant {
                    principal: entry.principal().clone(),
                    rights,
                })
            }
            EntryClass::AdminGrant(_) => None,
        });

    owner.into_iter().chain(entries)
}

/// Returns `true` if `state` deviates from `policy`.
///
/// Short-circuits on the first violation. A state with no administrators
/// grant at all is not a violation by itself.
///
/// # Example
///
/// ```
/// use permward_acl::{needs_migration, AclPolicy};
/// use permward_types::{AccessControlEntry, AccessRight, Principal, SecurityState};
///
/// let policy = AclPolicy::default();
/// let admins = Principal::builtin_administrators();
///
/// let good = SecurityState::new(
///     admins.clone(),
///     vec![AccessControlEntry::allow(admins.clone(), AccessRight::FULL_CONTROL)],
/// );
/// assert!(!needs_migration(&good, &policy));
///
/// let bad = SecurityState::new(Principal::account("guestUser"), vec![]);
/// assert!(needs_migration(&bad, &policy));
/// ```
#[must_use]
pub fn needs_migration(state: &SecurityState, policy: &AclPolicy) -> bool {
    violations(state, policy).next().is_some()
}
