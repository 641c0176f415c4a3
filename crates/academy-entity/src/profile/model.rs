//! Profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ProfileStatus;

/// A platform account and the root of every other aggregate.
///
/// `role` is the label exactly as stored. It becomes a
/// [`CanonicalRole`](super::CanonicalRole) only through the role alias table,
/// which fails closed on labels it does not know.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Unique profile identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Stored role label.
    pub role: String,
    /// Parent in the organizational tree.
    pub leader_id: Option<Uuid>,
    /// Profile that created this one.
    pub created_by: Option<Uuid>,
    /// Account status.
    pub status: ProfileStatus,
    /// The single currently valid session nonce.
    #[serde(skip_serializing)]
    pub session_id: Option<Uuid>,
    /// When the current session stops being valid.
    #[serde(skip_serializing)]
    pub session_expires_at: Option<DateTime<Utc>>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Whether `sid` is the live session at `now`.
    pub fn session_is_live(&self, sid: Uuid, now: DateTime<Utc>) -> bool {
        self.session_id == Some(sid) && self.session_expires_at.is_some_and(|exp| now < exp)
    }
}

/// Data required to create a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProfile {
    /// Desired username.
    pub username: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Role label to store.
    pub role: String,
    /// Parent in the organizational tree.
    pub leader_id: Option<Uuid>,
    /// Creating profile.
    pub created_by: Option<Uuid>,
}

impl NewProfile {
    /// Materializes the record with a fresh id.
    pub fn into_profile(self, now: DateTime<Utc>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: self.username,
            display_name: self.display_name,
            password_hash: self.password_hash,
            role: self.role,
            leader_id: self.leader_id,
            created_by: self.created_by,
            status: ProfileStatus::Active,
            session_id: None,
            session_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
