//! Restricted file access records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::RequestStatus;

/// A learner's request for one restricted file. One row per `(user_id, file_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileAccessRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
}

impl FileAccessRequest {
    /// A fresh `requested` row.
    pub fn requested(user_id: Uuid, file_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            file_id,
            status: RequestStatus::Requested,
            requested_at: now,
            reviewed_at: None,
            reviewed_by: None,
            rejection_reason: None,
        }
    }
}

/// A granted file permission, written when a request is approved.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FilePermission {
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub granted_by: Option<Uuid>,
    pub granted_at: DateTime<Utc>,
}
