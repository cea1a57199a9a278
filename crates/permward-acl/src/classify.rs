//! Per-entry classification.
//!
//! ```text
//! entry                          class
//! ─────────────────────────────  ──────────────────
//! Deny  { *, * }                 Preserve
//! Other { *, *, * }              Preserve
//! Allow { administrators, r }    AdminGrant(r)
//! Allow { anyone else, * }       Disallow
//! ```

use crate::AclPolicy;
use permward_types::{AccessControlEntry, AccessRight};

/// How the policy treats one access control entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryClass {
    /// Restriction or unrecognized entry; copied through unchanged.
    Preserve,
    /// Grant to a non-administrators principal; removed on migration.
    Disallow,
    /// Grant to administrators with its current mask.
    AdminGrant(AccessRight),
}

impl EntryClass {
    /// Returns `true` if this entry alone violates the policy.
    #[must_use]
    pub fn is_violation(self, policy: &AclPolicy) -> bool {
        match self {
            Self::Preserve => false,
            Self::Disallow => true,
            Self::AdminGrant(rights) => rights != policy.full_control(),
        }
    }
}

/// Classifies a single entry. Pure.
///
/// An allow entry with an empty mask is still [`EntryClass::Disallow`]:
/// untrusted principals hold no allow entries at all.
#[must_use]
pub fn classify(entry: &AccessControlEntry, policy: &AclPolicy) -> EntryClass {
    match entry {
        AccessControlEntry::Deny { .. } | AccessControlEntry::Other { .. } => EntryClass::Preserve,
        AccessControlEntry::Allow { principal, rights } => {
            if policy.is_administrators(principal) {
                EntryClass::AdminGrant(*rights)
            } else {
                EntryClass::Disallow
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permward_types::Principal;

    fn admins() -> Principal {
        Principal::builtin_administrators()
    }

    fn guest() -> Principal {
        Principal::account("guestUser")
    }

    #[test]
    fn deny_is_preserved() {
        let policy = AclPolicy::default();
        let entry = AccessControlEntry::deny(guest(), AccessRight::WRITE);
        assert_eq!(classify(&entry, &policy), EntryClass::Preserve);

        // Deny against administrators is still a user restriction.
        let entry = AccessControlEntry::deny(admins(), AccessRight::DELETE);
        assert_eq!(classify(&entry, &policy), EntryClass::Preserve);
    }

    #[test]
    fn other_kinds_are_preserved() {
        let policy = AclPolicy::default();
        let entry = AccessControlEntry::Other {
            kind: 0x05,
            principal: admins(),
            rights: AccessRight::FULL_CONTROL,
        };
        assert_eq!(classify(&entry, &policy), EntryClass::Preserve);
    }

    #[test]
    fn non_admin_allow_is_disallowed() {
        let policy = AclPolicy::default();
        for rights in [AccessRight::READ_DATA, AccessRight::FULL_CONTROL, AccessRight::empty()] {
            let entry = AccessControlEntry::allow(guest(), rights);
            assert_eq!(classify(&entry, &policy), EntryClass::Disallow);
        }
    }

    #[test]
    fn admin_allow_carries_rights() {
        let policy = AclPolicy::default();
        let entry = AccessControlEntry::allow(Principal::account("BUILTIN\\Administrators"), AccessRight::READ_DATA);
        assert_eq!(
            classify(&entry, &policy),
            EntryClass::AdminGrant(AccessRight::READ_DATA)
        );
    }

    #[test]
    fn violation_flags() {
        let policy = AclPolicy::default();
        assert!(!EntryClass::Preserve.is_violation(&policy));
        assert!(EntryClass::Disallow.is_violation(&policy));
        assert!(!EntryClass::AdminGrant(AccessRight::FULL_CONTROL).is_violation(&policy));
        assert!(EntryClass::AdminGrant(AccessRight::READ_DATA).is_violation(&policy));
    }
}
