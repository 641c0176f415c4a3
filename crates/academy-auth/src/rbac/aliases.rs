//! Static alias table mapping stored role labels onto [`CanonicalRole`].
//!
//! Historical rows carry role labels in several spellings, some of them
//! Chinese. Every lookup trims and lowercases the label first. A label that
//! is not in the table normalizes to `None`; callers must treat that as "no
//! role" and refuse, never as the lowest tier.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use academy_core::config::AuthConfig;
use academy_core::error::AppError;
use academy_entity::profile::CanonicalRole;

const BUILTIN_ALIASES: &[(&str, CanonicalRole)] = &[
    ("superadmin", CanonicalRole::SuperAdmin),
    ("super-admin", CanonicalRole::SuperAdmin),
    ("admin", CanonicalRole::SuperAdmin),
    ("超级管理员", CanonicalRole::SuperAdmin),
    ("超管", CanonicalRole::SuperAdmin),
    ("团队长", CanonicalRole::Leader),
    ("队长", CanonicalRole::Leader),
    ("领导", CanonicalRole::Leader),
    ("教练", CanonicalRole::Coach),
    ("助教", CanonicalRole::Assistant),
    ("学员", CanonicalRole::Student),
    ("交易员", CanonicalRole::Trader),
];

/// Normalizes stored role labels.
#[derive(Debug, Clone)]
pub struct RoleAliasTable {
    labels: BTreeMap<String, CanonicalRole>,
}

impl RoleAliasTable {
    /// Canonical names plus the built-in aliases.
    pub fn builtin() -> Self {
        let mut labels = BTreeMap::new();
        for role in CanonicalRole::ALL {
            labels.insert(role.as_str().to_string(), role);
        }
        for (label, role) in BUILTIN_ALIASES {
            labels.insert((*label).to_string(), *role);
        }
        Self { labels }
    }

    /// Built-in table extended with configured aliases.
    ///
    /// Fails with `CONFIGURATION` when an alias targets an unknown role or
    /// remaps a label that already means something else.
    pub fn with_extra(extra: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut table = Self::builtin();
        for (label, target) in extra {
            let key = normalize_key(label);
            if key.is_empty() {
                return Err(AppError::configuration("Empty role alias label"));
            }
            let role = CanonicalRole::from_canonical(&normalize_key(target)).ok_or_else(|| {
                AppError::configuration(format!(
                    "Role alias '{label}' targets unknown role '{target}'"
                ))
            })?;
            match table.labels.get(&key) {
                Some(existing) if *existing != role => {
                    return Err(AppError::configuration(format!(
                        "Role alias '{label}' conflicts with existing mapping to '{existing}'"
                    )));
                }
                _ => {
                    table.labels.insert(key, role);
                }
            }
        }
        Ok(table)
    }

    /// Table for the configured aliases.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AppError> {
        Self::with_extra(&config.role_aliases)
    }

    /// Maps a stored label to its canonical role, or `None` if unrecognized.
    pub fn normalize(&self, raw: &str) -> Option<CanonicalRole> {
        let role = self.labels.get(&normalize_key(raw)).copied();
        if role.is_none() {
            warn!(label = %raw, "Unrecognized role label");
        }
        role
    }

    /// Every normalized label that maps to `role`.
    pub fn labels_for(&self, role: CanonicalRole) -> Vec<String> {
        self.labels
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(label, _)| label.clone())
            .collect()
    }
}

impl Default for RoleAliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_labels() {
        let table = RoleAliasTable::builtin();
        assert_eq!(table.normalize("student"), Some(CanonicalRole::Student));
        assert_eq!(table.normalize("  SuperAdmin "), Some(CanonicalRole::SuperAdmin));
        assert_eq!(table.normalize("团队长"), Some(CanonicalRole::Leader));
        assert_eq!(table.normalize("助教"), Some(CanonicalRole::Assistant));
        assert_eq!(table.normalize("guest"), None);
        assert_eq!(table.normalize(""), None);
    }

    #[test]
    fn test_labels_for_super_admin() {
        let labels = RoleAliasTable::builtin().labels_for(CanonicalRole::SuperAdmin);
        for expected in ["super_admin", "superadmin", "admin", "超管"] {
            assert!(labels.iter().any(|l| l == expected), "missing {expected}");
        }
        assert!(!labels.iter().any(|l| l == "leader"));
    }

    #[test]
    fn test_extra_aliases_are_validated() {
        let ok = HashMap::from([("Head Coach".to_string(), "coach".to_string())]);
        let table = RoleAliasTable::with_extra(&ok).unwrap();
        assert_eq!(table.normalize("head coach"), Some(CanonicalRole::Coach));

        let unknown = HashMap::from([("mentor".to_string(), "mentor".to_string())]);
        assert_eq!(
            RoleAliasTable::with_extra(&unknown).unwrap_err().code(),
            "CONFIGURATION"
        );

        let conflict = HashMap::from([("admin".to_string(), "leader".to_string())]);
        assert_eq!(
            RoleAliasTable::with_extra(&conflict).unwrap_err().code(),
            "CONFIGURATION"
        );
    }
}
