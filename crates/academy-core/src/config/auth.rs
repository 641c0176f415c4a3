//! Authentication configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Credential and role-taxonomy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for session token signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Minimum password length.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
    /// Extra stored role labels mapped to canonical role names.
    ///
    /// Validated at startup; an alias pointing at an unknown role or
    /// conflicting with a built-in label refuses to load.
    #[serde(default)]
    pub role_aliases: HashMap<String, String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            password_min_length: default_password_min(),
            role_aliases: HashMap::new(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_password_min() -> usize {
    8
}
