//! Access rights carried by access control entries.
//!
//! [`AccessRight`] is the bitmask an entry grants or denies. Bit values
//! follow the file-object access mask layout so that masks read from a
//! security descriptor can be stored without translation.
//!
//! # Full Control
//!
//! [`AccessRight::FULL_CONTROL`] is the union of every named right below.
//! It is a fixed constant of the policy, not something derived from the
//! live system:
//!
//! ```
//! use permward_types::AccessRight;
//!
//! assert_eq!(AccessRight::FULL_CONTROL.bits(), 0x001F_01FF);
//! assert!(AccessRight::FULL_CONTROL.contains(AccessRight::WRITE_DAC));
//! ```
//!
//! # Unknown Bits
//!
//! Bits outside the named set (generic rights, `ACCESS_SYSTEM_SECURITY`,
//! ...) are retained. A deny entry read with `GENERIC_WRITE` must be
//! written back with `GENERIC_WRITE`, so use
//! [`from_bits_retain`](AccessRight::from_bits_retain) when decoding.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Rights over a file or directory.
    ///
    /// | Right | Directory meaning | File meaning |
    /// |-------|-------------------|--------------|
    /// | [`LIST_DIRECTORY`](Self::LIST_DIRECTORY) | list contents | read data |
    /// | [`WRITE_DATA`](Self::WRITE_DATA) | add file | write data |
    /// | [`APPEND_DATA`](Self::APPEND_DATA) | add subdirectory | append data |
    /// | [`TRAVERSE`](Self::TRAVERSE) | traverse | execute |
    /// | [`DELETE_CHILD`](Self::DELETE_CHILD) | delete children | - |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct AccessRight: u32 {
        const LIST_DIRECTORY   = 0x0000_0001;
        const WRITE_DATA       = 0x0000_0002;
        const APPEND_DATA      = 0x0000_0004;
        const READ_EA          = 0x0000_0008;
        const WRITE_EA         = 0x0000_0010;
        const TRAVERSE         = 0x0000_0020;
        const DELETE_CHILD     = 0x0000_0040;
        const READ_ATTRIBUTES  = 0x0000_0080;
        const WRITE_ATTRIBUTES = 0x0000_0100;
        const DELETE           = 0x0001_0000;
        const READ_CONTROL     = 0x0002_0000;
        const WRITE_DAC        = 0x0004_0000;
        const WRITE_OWNER      = 0x0008_0000;
        const SYNCHRONIZE      = 0x0010_0000;

        // Keep foreign bits intact on round-trips.
        const _ = !0;
    }
}

impl AccessRight {
    /// Reading file data; same bit as [`LIST_DIRECTORY`](Self::LIST_DIRECTORY).
    pub const READ_DATA: Self = Self::LIST_DIRECTORY;

    /// Executing a file; same bit as [`TRAVERSE`](Self::TRAVERSE).
    pub const EXECUTE: Self = Self::TRAVERSE;

    /// The rights a plain "write" grant or deny usually carries.
    pub const WRITE: Self = Self::WRITE_DATA
        .union(Self::APPEND_DATA)
        .union(Self::WRITE_EA)
        .union(Self::WRITE_ATTRIBUTES);

    /// Every right the policy considers complete administrative access.
    pub const FULL_CONTROL: Self = Self::LIST_DIRECTORY
        .union(Self::WRITE_DATA)
        .union(Self::APPEND_DATA)
        .union(Self::READ_EA)
        .union(Self::WRITE_EA)
        .union(Self::TRAVERSE)
        .union(Self::DELETE_CHILD)
        .union(Self::READ_ATTRIBUTES)
        .union(Self::WRITE_ATTRIBUTES)
        .union(Self::DELETE)
        .union(Self::READ_CONTROL)
        .union(Self::WRITE_DAC)
        .union(Self::WRITE_OWNER)
        .union(Self::SYNCHRONIZE);

    /// Returns `true` if this mask is exactly [`FULL_CONTROL`](Self::FULL_CONTROL).
    ///
    /// A superset (e.g. full control plus `GENERIC_ALL`) is not full control
    /// for policy purposes.
    #[must_use]
    pub fn is_full_control(self) -> bool {
        self == Self::FULL_CONTROL
    }

    /// Returns the names of the set named rights, in bit order.
    ///
    /// ```
    /// use permward_types::AccessRight;
    ///
    /// let mask = AccessRight::DELETE | AccessRight::LIST_DIRECTORY;
    /// assert_eq!(mask.names(), vec!["LIST_DIRECTORY", "DELETE"]);
    /// ```
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    /// Returns the bits outside every named right.
    #[must_use]
    pub fn unknown_bits(self) -> u32 {
        self.bits() & !Self::FULL_CONTROL.bits()
    }
}

impl std::fmt::Display for AccessRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        if self.is_full_control() {
            return write!(f, "FULL_CONTROL");
        }
        let mut parts: Vec<String> = self.names().into_iter().map(str::to_string).collect();
        let unknown = self.unknown_bits();
        if unknown != 0 {
            parts.push(format!("{unknown:#010x}"));
        }
        write!(f, "{}", parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_control_mask_value() {
        assert_eq!(AccessRight::FULL_CONTROL.bits(), 0x001F_01FF);
    }

    #[test]
    fn full_control_contains_every_named_right() {
        for (name, flag) in AccessRight::all().iter_names() {
            assert!(
                AccessRight::FULL_CONTROL.contains(flag),
                "missing from FULL_CONTROL: {name}"
            );
        }
    }

    #[test]
    fn superset_is_not_full_control() {
        let generic_all = AccessRight::from_bits_retain(0x1000_0000);
        let mask = AccessRight::FULL_CONTROL | generic_all;
        assert!(!mask.is_full_control());
        assert!(mask.contains(AccessRight::FULL_CONTROL));
    }

    #[test]
    fn subset_is_not_full_control() {
        let mask = AccessRight::FULL_CONTROL - AccessRight::WRITE_OWNER;
        assert!(!mask.is_full_control());
    }

    #[test]
    fn unknown_bits_retained() {
        let mask = AccessRight::from_bits_retain(0x4000_0001);
        assert_eq!(mask.bits(), 0x4000_0001);
        assert_eq!(mask.unknown_bits(), 0x4000_0000);
        assert!(mask.contains(AccessRight::READ_DATA));
    }

    #[test]
    fn aliases_share_bits() {
        assert_eq!(AccessRight::READ_DATA, AccessRight::LIST_DIRECTORY);
        assert_eq!(AccessRight::EXECUTE, AccessRight::TRAVERSE);
    }

    #[test]
    fn display_formatting() {
        assert_eq!(AccessRight::empty().to_string(), "(none)");
        assert_eq!(AccessRight::FULL_CONTROL.to_string(), "FULL_CONTROL");
        assert_eq!(
            (AccessRight::READ_DATA | AccessRight::SYNCHRONIZE).to_string(),
            "LIST_DIRECTORY | SYNCHRONIZE"
        );
        assert_eq!(
            AccessRight::from_bits_retain(0x8000_0002).to_string(),
            "WRITE_DATA | 0x80000000"
        );
    }

    #[test]
    fn serde_roundtrip_keeps_unknown_bits() {
        let mask = AccessRight::WRITE | AccessRight::from_bits_retain(0x4000_0000);
        let json = serde_json::to_string(&mask).expect("serialize");
        let parsed: AccessRight = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, mask);
    }
}
