//! Membership roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A member's role within the congregation.
///
/// `Staff` and `Pastor` are the manager roles: they are granted directory
/// and attendance write access by the front end.
///
/// Backends occasionally report roles outside this set (`"admin"` has been
/// seen in the wild). Unrecognized strings are never coerced to a default;
/// they normalize to an absent role via [`Role::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Pastor,
    Staff,
    Member,
    Guest,
}

impl Role {
    /// Parse a role from its wire representation.
    ///
    /// Returns `None` for anything outside the recognized set.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pastor" => Some(Self::Pastor),
            "staff" => Some(Self::Staff),
            "member" => Some(Self::Member),
            "guest" => Some(Self::Guest),
            _ => None,
        }
    }

    /// Returns the wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pastor => "pastor",
            Self::Staff => "staff",
            Self::Member => "member",
            Self::Guest => "guest",
        }
    }

    /// Whether this role is granted directory/attendance write access.
    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::Pastor | Self::Staff)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
