//! Session cookie configuration.

use serde::{Deserialize, Serialize};

/// Session lifetime and cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session lifetime in hours.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Cookie path attribute.
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    /// Whether the cookie carries the `Secure` attribute.
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: default_ttl_hours(),
            cookie_name: default_cookie_name(),
            cookie_path: default_cookie_path(),
            cookie_secure: true,
        }
    }
}

fn default_ttl_hours() -> u64 {
    168
}

fn default_cookie_name() -> String {
    "academy_session".to_string()
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_true() -> bool {
    true
}
