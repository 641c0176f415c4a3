//! Session cookie metadata.

use serde::{Deserialize, Serialize};

use academy_core::config::SessionConfig;

/// Attributes of the session cookie carrying a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
    /// Zero clears the cookie.
    pub max_age_seconds: i64,
    pub path: String,
    pub http_only: bool,
    /// Always `Lax`.
    pub same_site: String,
    pub secure: bool,
}

impl SessionCookie {
    /// Cookie holding `token` for `max_age_seconds`.
    pub fn new(config: &SessionConfig, token: String, max_age_seconds: i64) -> Self {
        Self {
            name: config.cookie_name.clone(),
            value: token,
            max_age_seconds,
            path: config.cookie_path.clone(),
            http_only: true,
            same_site: "Lax".to_string(),
            secure: config.cookie_secure,
        }
    }

    /// Cookie that makes the client drop its session.
    pub fn cleared(config: &SessionConfig) -> Self {
        Self::new(config, String::new(), 0)
    }

    /// `Set-Cookie` header value.
    pub fn to_header_value(&self) -> String {
        let mut value = format!(
            "{}={}; Max-Age={}; Path={}; SameSite={}",
            self.name, self.value, self.max_age_seconds, self.path, self.same_site
        );
        if self.http_only {
            value.push_str("; HttpOnly");
        }
        if self.secure {
            value.push_str("; Secure");
        }
        value
    }
}
