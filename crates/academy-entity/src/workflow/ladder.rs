//! Leaderboard viewing authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::RequestStatus;

/// One row per learner; upserted on `user_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LadderAuthorization {
    pub user_id: Uuid,
    /// Mirrors `status == approved`.
    pub enabled: bool,
    pub status: RequestStatus,
    pub requested_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
}

impl LadderAuthorization {
    /// A fresh `requested` row.
    pub fn requested(user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            enabled: false,
            status: RequestStatus::Requested,
            requested_at: Some(now),
            reviewed_at: None,
            reviewed_by: None,
            rejection_reason: None,
        }
    }
}
