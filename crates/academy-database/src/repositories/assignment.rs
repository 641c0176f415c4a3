//! Coach assignment repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::profile::CoachAssignment;

/// Persistence for coach-to-student links.
#[async_trait]
pub trait AssignmentRepo: Send + Sync + std::fmt::Debug + 'static {
    /// Student ids assigned to `coach_id`.
    async fn students_of(&self, coach_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Insert a link; an existing link is left untouched.
    async fn assign(&self, assignment: &CoachAssignment) -> AppResult<()>;

    /// Remove a link. Returns `false` when there was none.
    async fn unassign(&self, coach_id: Uuid, student_id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL implementation of [`AssignmentRepo`].
#[derive(Debug, Clone)]
pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepo for PgAssignmentRepository {
    async fn students_of(&self, coach_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT student_id FROM coach_assignments WHERE coach_id = $1")
            .bind(coach_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load coach assignments", e)
            })
    }

    async fn assign(&self, assignment: &CoachAssignment) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO coach_assignments (coach_id, student_id, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (coach_id, student_id) DO NOTHING",
        )
        .bind(assignment.coach_id)
        .bind(assignment.student_id)
        .bind(assignment.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to assign coach", e))?;
        Ok(())
    }

    async fn unassign(&self, coach_id: Uuid, student_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM coach_assignments WHERE coach_id = $1 AND student_id = $2")
                .bind(coach_id)
                .bind(student_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to unassign coach", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
