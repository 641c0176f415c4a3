//! Course access request and progress summary repositories.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::workflow::{CourseAccessRequest, ProgressSummary, RequestStatus};

/// Persistence for per-lesson access rows.
#[async_trait]
pub trait CourseAccessRepo: Send + Sync + std::fmt::Debug + 'static {
    /// The row for `(user_id, course_id)`, if any.
    async fn find(&self, user_id: Uuid, course_id: i32) -> AppResult<Option<CourseAccessRequest>>;

    /// Upsert on `(user_id, course_id)`.
    async fn save(&self, row: &CourseAccessRequest) -> AppResult<()>;

    /// Rows in `status`, optionally restricted to `user_ids`, oldest request first.
    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<CourseAccessRequest>>;
}

/// Persistence for lesson summaries.
#[async_trait]
pub trait SummaryRepo: Send + Sync + std::fmt::Debug + 'static {
    async fn find(&self, user_id: Uuid, course_id: i32) -> AppResult<Option<ProgressSummary>>;

    /// Upsert on `(user_id, course_id)`.
    async fn upsert(&self, summary: &ProgressSummary) -> AppResult<()>;
}

/// PostgreSQL implementation of [`CourseAccessRepo`].
#[derive(Debug, Clone)]
pub struct PgCourseAccessRepository {
    pool: PgPool,
}

impl PgCourseAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseAccessRepo for PgCourseAccessRepository {
    async fn find(&self, user_id: Uuid, course_id: i32) -> AppResult<Option<CourseAccessRequest>> {
        sqlx::query_as::<_, CourseAccessRequest>(
            "SELECT * FROM course_access_requests WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find course access", e))
    }

    async fn save(&self, row: &CourseAccessRequest) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO course_access_requests (id, user_id, course_id, status, progress, \
             last_video_sec, requested_at, reviewed_at, reviewed_by, rejection_reason, completed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (user_id, course_id) DO UPDATE SET \
             status = EXCLUDED.status, progress = EXCLUDED.progress, \
             last_video_sec = EXCLUDED.last_video_sec, requested_at = EXCLUDED.requested_at, \
             reviewed_at = EXCLUDED.reviewed_at, reviewed_by = EXCLUDED.reviewed_by, \
             rejection_reason = EXCLUDED.rejection_reason, completed_at = EXCLUDED.completed_at",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.course_id)
        .bind(row.status)
        .bind(row.progress)
        .bind(row.last_video_sec)
        .bind(row.requested_at)
        .bind(row.reviewed_at)
        .bind(row.reviewed_by)
        .bind(&row.rejection_reason)
        .bind(row.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save course access", e))?;
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<CourseAccessRequest>> {
        sqlx::query_as::<_, CourseAccessRequest>(
            "SELECT * FROM course_access_requests \
             WHERE status = $1 AND ($2::uuid[] IS NULL OR user_id = ANY($2)) \
             ORDER BY requested_at ASC",
        )
        .bind(status)
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list course access requests", e)
        })
    }
}

/// PostgreSQL implementation of [`SummaryRepo`].
#[derive(Debug, Clone)]
pub struct PgSummaryRepository {
    pool: PgPool,
}

impl PgSummaryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SummaryRepo for PgSummaryRepository {
    async fn find(&self, user_id: Uuid, course_id: i32) -> AppResult<Option<ProgressSummary>> {
        sqlx::query_as::<_, ProgressSummary>(
            "SELECT * FROM progress_summaries WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find summary", e))
    }

    async fn upsert(&self, summary: &ProgressSummary) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO progress_summaries (user_id, course_id, content, submitted_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, course_id) DO UPDATE SET \
             content = EXCLUDED.content, submitted_at = EXCLUDED.submitted_at",
        )
        .bind(summary.user_id)
        .bind(summary.course_id)
        .bind(&summary.content)
        .bind(summary.submitted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save summary", e))?;
        Ok(())
    }
}
