//! Canonical role enumeration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The six normalized privilege tiers.
///
/// Stored labels are mapped onto these by the role alias table; this enum is
/// never parsed leniently from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalRole {
    Student,
    Trader,
    Coach,
    Assistant,
    Leader,
    SuperAdmin,
}

impl CanonicalRole {
    /// Every canonical role.
    pub const ALL: [CanonicalRole; 6] = [
        Self::Student,
        Self::Trader,
        Self::Coach,
        Self::Assistant,
        Self::Leader,
        Self::SuperAdmin,
    ];

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Trader => "trader",
            Self::Coach => "coach",
            Self::Assistant => "assistant",
            Self::Leader => "leader",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Exact canonical-name lookup (no aliasing).
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }

    /// leader or super_admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Leader | Self::SuperAdmin)
    }

    /// Roles that review requests.
    pub fn is_manager(&self) -> bool {
        matches!(
            self,
            Self::Leader | Self::SuperAdmin | Self::Coach | Self::Assistant
        )
    }

    /// Roles that submit requests against their own records.
    pub fn is_learner(&self) -> bool {
        matches!(
            self,
            Self::Student | Self::Trader | Self::Coach | Self::Assistant
        )
    }

    /// Roles a non-super-admin manager may hand out.
    pub fn is_plain_learner(&self) -> bool {
        matches!(self, Self::Student | Self::Trader)
    }
}

impl fmt::Display for CanonicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
