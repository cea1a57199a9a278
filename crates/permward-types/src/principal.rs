//! Principal (security identity) types.
//!
//! A [`Principal`] identifies the subject an access control entry grants
//! or denies rights to, and the owner of a secured object.
//!
//! # Identity vs. Encoding
//!
//! The same conceptual principal can arrive in more than one encoding:
//!
//! | Input | Form |
//! |-------|------|
//! | `S-1-5-32-544` | SID, decimal authority |
//! | `s-1-0x000000000005-32-544` | SID, hex authority |
//! | `BUILTIN\Administrators` | Account name |
//! | `administrators` | Account name, short |
//!
//! All four denote the builtin administrators group. Policy code must use
//! [`Principal::is_builtin_administrators`] rather than `==` when asking
//! that question.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// NT authority (`SECURITY_NT_AUTHORITY`).
const NT_AUTHORITY: u64 = 5;

/// Builtin domain RID (`SECURITY_BUILTIN_DOMAIN_RID`).
const BUILTIN_DOMAIN_RID: u32 = 32;

/// Administrators alias RID (`DOMAIN_ALIAS_RID_ADMINS`).
const ADMINS_ALIAS_RID: u32 = 544;

/// Maximum number of sub-authorities in a SID.
const MAX_SUB_AUTHORITIES: usize = 15;

/// Largest identifier authority (48 bits).
const MAX_AUTHORITY: u64 = (1 << 48) - 1;

/// Errors from parsing a [`Principal`] or [`Sid`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalParseError {
    /// Input was empty or whitespace.
    #[error("principal is empty")]
    Empty,

    /// Input looked like a SID but is malformed.
    #[error("invalid sid '{input}': {reason}")]
    InvalidSid { input: String, reason: &'static str },
}

impl PrincipalParseError {
    fn invalid_sid(input: &str, reason: &'static str) -> Self {
        Self::InvalidSid {
            input: input.to_string(),
            reason,
        }
    }
}

/// A security identifier in structured form.
///
/// # Example
///
/// ```
/// use permward_types::Sid;
///
/// let sid: Sid = "S-1-5-32-544".parse().expect("valid sid");
/// assert_eq!(sid.authority(), 5);
/// assert_eq!(sid.sub_authorities(), &[32, 544]);
/// assert_eq!(sid.to_string(), "S-1-5-32-544");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sid {
    revision: u8,
    authority: u64,
    sub_authorities: Vec<u32>,
}

impl Sid {
    /// Creates a revision-1 SID.
    #[must_use]
    pub fn new(authority: u64, sub_authorities: Vec<u32>) -> Self {
        Self {
            revision: 1,
            authority,
            sub_authorities,
        }
    }

    /// The well-known `S-1-5-32-544` (builtin administrators) SID.
    #[must_use]
    pub fn builtin_administrators() -> Self {
        Self::new(NT_AUTHORITY, vec![BUILTIN_DOMAIN_RID, ADMINS_ALIAS_RID])
    }

    /// Returns the identifier authority.
    #[must_use]
    pub fn authority(&self) -> u64 {
        self.authority
    }

    /// Returns the sub-authorities, most significant first.
    #[must_use]
    pub fn sub_authorities(&self) -> &[u32] {
        &self.sub_authorities
    }

    /// Returns `true` if this SID names the builtin administrators group.
    #[must_use]
    pub fn is_builtin_administrators(&self) -> bool {
        self.revision == 1
            && self.authority == NT_AUTHORITY
            && self.sub_authorities == [BUILTIN_DOMAIN_RID, ADMINS_ALIAS_RID]
    }
}

impl FromStr for Sid {
    type Err = PrincipalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let mut parts = input.split('-');

        match parts.next() {
            Some(p) if p.eq_ignore_ascii_case("s") => {}
            _ => return Err(PrincipalParseError::invalid_sid(input, "missing 'S-' prefix")),
        }

        let revision = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(|| PrincipalParseError::invalid_sid(input, "bad revision"))?;
        if revision != 1 {
            return Err(PrincipalParseError::invalid_sid(input, "unsupported revision"));
        }

        let authority = parts
            .next()
            .and_then(parse_authority)
            .ok_or_else(|| PrincipalParseError::invalid_sid(input, "bad identifier authority"))?;

        let sub_authorities = parts
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PrincipalParseError::invalid_sid(input, "bad sub-authority"))?;
        if sub_authorities.len() > MAX_SUB_AUTHORITIES {
            return Err(PrincipalParseError::invalid_sid(
                input,
                "too many sub-authorities",
            ));
        }

        Ok(Self {
            revision,
            authority,
            sub_authorities,
        })
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal identifier authority.
fn parse_authority(s: &str) -> Option<u64> {
    let value = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok()?,
        None => s.parse::<u64>().ok()?,
    };
    (value <= MAX_AUTHORITY).then_some(value)
}

impl fmt::Display for Sid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}-", self.revision)?;
        // Same rendering as ConvertSidToStringSid: hex only above 32 bits.
        if self.authority >= 1 << 32 {
            write!(f, "0x{:012X}", self.authority)?;
        } else {
            write!(f, "{}", self.authority)?;
        }
        for sub in &self.sub_authorities {
            write!(f, "-{sub}")?;
        }
        Ok(())
    }
}

/// The subject of an access control entry or the owner of an object.
///
/// # Example
///
/// ```
/// use permward_types::Principal;
///
/// let admins: Principal = "BUILTIN\\Administrators".parse().expect("valid principal");
/// assert!(admins.is_builtin_administrators());
///
/// let guest: Principal = "guestUser".parse().expect("valid principal");
/// assert!(!guest.is_builtin_administrators());
/// ```
///
/// # Text form
///
/// Parsing (and so deserialization) treats any input starting with `S-`
/// and a digit, in either case, as a SID and rejects it if malformed. An
/// [`Principal::Account`] whose name has that shape therefore has no text
/// form that reads back as the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Principal {
    /// Structured security identifier.
    Sid(Sid),
    /// Account or group name, optionally domain-qualified.
    Account(String),
}

impl Principal {
    /// The builtin administrators group in canonical SID form.
    #[must_use]
    pub fn builtin_administrators() -> Self {
        Self::Sid(Sid::builtin_administrators())
    }

    /// Creates an account-name principal.
    ///
    /// `name` should not look like a SID (`S-<digit>...`); see the
    /// type-level notes on the text form.
    #[must_use]
    pub fn account(name: impl Into<String>) -> Self {
        Self::Account(name.into())
    }

    /// Returns `true` if this principal denotes the builtin administrators
    /// group, whatever its encoding.
    #[must_use]
    pub fn is_builtin_administrators(&self) -> bool {
        match self {
            Self::Sid(sid) => sid.is_builtin_administrators(),
            Self::Account(name) => {
                name.eq_ignore_ascii_case("administrators")
                    || name.eq_ignore_ascii_case("builtin\\administrators")
            }
        }
    }

    /// Returns the [`Sid`] if this is a SID principal.
    #[must_use]
    pub fn sid(&self) -> Option<&Sid> {
        match self {
            Self::Sid(sid) => Some(sid),
            Self::Account(_) => None,
        }
    }
}

impl FromStr for Principal {
    type Err = PrincipalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PrincipalParseError::Empty);
        }

        let bytes = trimmed.as_bytes();
        let looks_like_sid = bytes.len() > 2
            && bytes[0].eq_ignore_ascii_case(&b's')
            && bytes[1] == b'-'
            && bytes[2].is_ascii_digit();
        if looks_like_sid {
            return trimmed.parse().map(Self::Sid);
        }

        Ok(Self::Account(trimmed.to_string()))
    }
}

impl TryFrom<String> for Principal {
    type Error = PrincipalParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.to_string()
    }
}

impl From<Sid> for Principal {
    fn from(value: Sid) -> Self {
        Self::Sid(value)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sid(sid) => fmt::Display::fmt(sid, f),
            Self::Account(name) => f.write_str(name),
        }
    }
}
