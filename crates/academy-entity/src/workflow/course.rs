//! Course access and progress summary records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::RequestStatus;

/// A learner's request to unlock lesson `course_id`, plus its progress.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseAccessRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: i32,
    pub status: RequestStatus,
    /// Percent watched, 0..=100.
    pub progress: i32,
    /// Resume position of the lesson video.
    pub last_video_sec: i32,
    pub requested_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CourseAccessRequest {
    /// A fresh `requested` row.
    pub fn requested(user_id: Uuid, course_id: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            course_id,
            status: RequestStatus::Requested,
            progress: 0,
            last_video_sec: 0,
            requested_at: now,
            reviewed_at: None,
            reviewed_by: None,
            rejection_reason: None,
            completed_at: None,
        }
    }

    /// Puts a rejected row back into `requested`, clearing reviewer and
    /// progress fields.
    pub fn reset_to_requested(&mut self, now: DateTime<Utc>) {
        self.status = RequestStatus::Requested;
        self.requested_at = now;
        self.reviewed_at = None;
        self.reviewed_by = None;
        self.rejection_reason = None;
        self.clear_progress();
    }

    /// Drops watch progress and the completion stamp.
    pub fn clear_progress(&mut self) {
        self.progress = 0;
        self.last_video_sec = 0;
        self.completed_at = None;
    }
}

/// A learner's written summary for a finished lesson.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressSummary {
    pub user_id: Uuid,
    pub course_id: i32,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
}
