//! Consult message model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How long after sending a message its sender may still delete it.
pub const RECALL_WINDOW_SECONDS: i64 = 5 * 60;

/// One message between two users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConsultMessage {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl ConsultMessage {
    /// Whether the message can still be recalled at `now` (inclusive bound).
    pub fn within_recall_window(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at <= Duration::seconds(RECALL_WINDOW_SECONDS)
    }

    /// The other participant, seen from `user_id`.
    pub fn partner_of(&self, user_id: Uuid) -> Uuid {
        if self.from_user_id == user_id {
            self.to_user_id
        } else {
            self.from_user_id
        }
    }
}

/// Sidebar entry: one conversation partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationSummary {
    pub peer_id: Uuid,
    /// Unread messages from the peer to the caller.
    pub unread: i64,
    /// Newest message in either direction.
    pub last_activity: DateTime<Utc>,
}
