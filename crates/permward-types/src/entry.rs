//! Access control entries and security state.
//!
//! A [`SecurityState`] is the transient view over one object's owner and
//! discretionary access list. It is read fresh from the filesystem on each
//! call and never cached.

use crate::{AccessRight, Principal};
use serde::{Deserialize, Serialize};

/// One entry of a discretionary access list.
///
/// Entry order matters for how the OS evaluates the list; policy code here
/// treats each entry independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessControlEntry {
    /// Grants `rights` to `principal`.
    Allow {
        principal: Principal,
        rights: AccessRight,
    },

    /// Denies `rights` to `principal`.
    Deny {
        principal: Principal,
        rights: AccessRight,
    },

    /// Any other entry type (object, callback, audit, alarm...).
    ///
    /// `kind` is the raw entry-type byte from the entry header.
    Other {
        kind: u8,
        principal: Principal,
        rights: AccessRight,
    },
}

impl AccessControlEntry {
    /// Creates an allow entry.
    #[must_use]
    pub fn allow(principal: Principal, rights: AccessRight) -> Self {
        Self::Allow { principal, rights }
    }

    /// Creates a deny entry.
    #[must_use]
    pub fn deny(principal: Principal, rights: AccessRight) -> Self {
        Self::Deny { principal, rights }
    }

    /// Returns the principal the entry applies to.
    #[must_use]
    pub fn principal(&self) -> &Principal {
        match self {
            Self::Allow { principal, .. }
            | Self::Deny { principal, .. }
            | Self::Other { principal, .. } => principal,
        }
    }

    /// Returns the entry's access mask.
    #[must_use]
    pub fn rights(&self) -> AccessRight {
        match self {
            Self::Allow { rights, .. } | Self::Deny { rights, .. } | Self::Other { rights, .. } => {
                *rights
            }
        }
    }

    /// Returns `true` for [`AccessControlEntry::Allow`].
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Returns `true` for [`AccessControlEntry::Deny`].
    #[must_use]
    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny { .. })
    }

    /// Short label for logs: `allow`, `deny` or `other`.
    #[must_use]
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Allow { .. } => "allow",
            Self::Deny { .. } => "deny",
            Self::Other { .. } => "other",
        }
    }
}

/// Owner and discretionary access list of one filesystem object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityState {
    /// Owning principal.
    pub owner: Principal,
    /// Entries in list order.
    pub entries: Vec<AccessControlEntry>,
}

impl SecurityState {
    /// Creates a state from an owner and entries.
    #[must_use]
    pub fn new(owner: Principal, entries: Vec<AccessControlEntry>) -> Self {
        Self { owner, entries }
    }

    /// Iterates over the deny entries, in list order.
    pub fn deny_entries(&self) -> impl Iterator<Item = &AccessControlEntry> {
        self.entries.iter().filter(|e| e.is_deny())
    }

    /// Iterates over the allow entries, in list order.
    pub fn allow_entries(&self) -> impl Iterator<Item = &AccessControlEntry> {
        self.entries.iter().filter(|e| e.is_allow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guest() -> Principal {
        Principal::account("guestUser")
    }

    #[test]
    fn accessors() {
        let entry = AccessControlEntry::deny(guest(), AccessRight::WRITE);
        assert_eq!(entry.principal(), &guest());
        assert_eq!(entry.rights(), AccessRight::WRITE);
        assert!(entry.is_deny());
        assert!(!entry.is_allow());
        assert_eq!(entry.kind_str(), "deny");

        let other = AccessControlEntry::Other {
            kind: 0x02,
            principal: guest(),
            rights: AccessRight::READ_DATA,
        };
        assert!(!other.is_deny() && !other.is_allow());
        assert_eq!(other.kind_str(), "other");
    }

    #[test]
    fn state_filters_preserve_order() {
        let a = Principal::account("a");
        let b = Principal::account("b");
        let state = SecurityState::new(
            guest(),
            vec![
                AccessControlEntry::deny(a.clone(), AccessRight::DELETE),
                AccessControlEntry::allow(guest(), AccessRight::READ_DATA),
                AccessControlEntry::deny(b.clone(), AccessRight::WRITE),
            ],
        );

        let denies: Vec<_> = state.deny_entries().map(|e| e.principal().clone()).collect();
        assert_eq!(denies, vec![a, b]);
        assert_eq!(state.allow_entries().count(), 1);
    }

    #[test]
    fn serde_tagged_representation() {
        let entry = AccessControlEntry::allow(Principal::builtin_administrators(), AccessRight::DELETE);
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["type"], "allow");
        assert_eq!(json["principal"], "S-1-5-32-544");

        let parsed: AccessControlEntry = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, entry);
    }
}
