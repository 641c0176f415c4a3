//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use academy_entity::notification::NotificationKey;
use academy_entity::profile::ProfileStatus;
use academy_entity::workflow::ReviewDecision;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Any recognized role label.
    #[validate(length(min = 1, max = 64))]
    pub role: String,
    #[validate(length(max = 100))]
    pub display_name: Option<String>,
    pub leader_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    pub status: ProfileStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignCoachRequest {
    pub coach_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProgressRequest {
    #[validate(range(min = 0))]
    pub last_video_sec: i32,
    #[validate(range(min = 0, max = 100))]
    pub progress: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SummaryRequest {
    #[validate(length(min = 1, max = 20000))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CourseReviewRequest {
    pub user_id: Uuid,
    pub course_id: i32,
    pub decision: ReviewDecision,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LadderReviewRequest {
    #[validate(length(min = 1, max = 500))]
    pub user_ids: Vec<Uuid>,
    pub decision: ReviewDecision,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FileReviewRequest {
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub decision: ReviewDecision,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// The grouping tuple of the notification being marked read.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MarkReadRequest {
    pub from_user_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<MarkReadRequest> for NotificationKey {
    fn from(req: MarkReadRequest) -> Self {
        Self {
            from_user_id: req.from_user_id,
            title: req.title,
            content: req.content,
            created_at: req.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AcquireJobRequest {
    /// Defaults to `worker.default_lease_seconds`.
    #[validate(range(min = 1, max = 86400))]
    pub lease_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ReleaseJobRequest {
    #[validate(length(max = 4000))]
    pub error: Option<String>,
}
