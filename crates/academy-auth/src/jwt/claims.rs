//! Session token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims signed into every session token.
///
/// The token only proves that `{uid, sid}` was issued by this server and has
/// not expired. Whether `sid` is still the account's live session is decided
/// by [`SessionManager::resolve`](crate::session::SessionManager::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Profile id.
    pub uid: Uuid,
    /// Session nonce.
    pub sid: Uuid,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Whether the token has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}
