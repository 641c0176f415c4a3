//! Notification entity model and its grouped read key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A directed message from a user (or the system) to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Storage identifier. Read transitions never rely on it.
    pub id: Uuid,
    /// Recipient.
    pub to_user_id: Uuid,
    /// Sender; `None` for system notifications.
    pub from_user_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// The grouping tuple used for read transitions.
    pub fn key(&self) -> NotificationKey {
        NotificationKey {
            from_user_id: self.from_user_id,
            title: self.title.clone(),
            content: self.content.clone(),
            created_at: self.created_at,
        }
    }

    /// Whether the row matches `key`.
    pub fn matches(&self, key: &NotificationKey) -> bool {
        self.from_user_id == key.from_user_id
            && self.title == key.title
            && self.content == key.content
            && self.created_at == key.created_at
    }
}

/// `(from_user_id, title, content, created_at)`.
///
/// Two notifications with equal keys are indistinguishable for "mark read":
/// marking one marks both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationKey {
    pub from_user_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
