//! Profile status enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profile_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    /// Normal account.
    Active,
    /// Authenticates, but every guard refuses with `FROZEN`.
    Frozen,
    /// Soft-deleted; sessions never resolve.
    Deleted,
}

impl ProfileStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Frozen => "frozen",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileStatus {
    type Err = academy_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "frozen" => Ok(Self::Frozen),
            "deleted" => Ok(Self::Deleted),
            _ => Err(academy_core::AppError::invalid_body(format!(
                "Invalid profile status: '{s}'. Expected one of: active, frozen, deleted"
            ))),
        }
    }
}
