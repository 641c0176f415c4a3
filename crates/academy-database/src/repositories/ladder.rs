//! Ladder authorization repository.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::workflow::{LadderAuthorization, RequestStatus};

/// Persistence for per-learner ladder rows.
#[async_trait]
pub trait LadderRepo: Send + Sync + std::fmt::Debug + 'static {
    async fn find(&self, user_id: Uuid) -> AppResult<Option<LadderAuthorization>>;

    /// Upsert every row on `user_id` in one statement.
    async fn upsert_many(&self, rows: &[LadderAuthorization]) -> AppResult<()>;

    /// Rows in `status`, optionally restricted to `user_ids`.
    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<LadderAuthorization>>;
}

/// PostgreSQL implementation of [`LadderRepo`].
#[derive(Debug, Clone)]
pub struct PgLadderRepository {
    pool: PgPool,
}

impl PgLadderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LadderRepo for PgLadderRepository {
    async fn find(&self, user_id: Uuid) -> AppResult<Option<LadderAuthorization>> {
        sqlx::query_as::<_, LadderAuthorization>(
            "SELECT * FROM ladder_authorizations WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ladder row", e))
    }

    async fn upsert_many(&self, rows: &[LadderAuthorization]) -> AppResult<()> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO ladder_authorizations (user_id, enabled, status, requested_at, \
             reviewed_at, reviewed_by, rejection_reason) ",
        );
        builder.push_values(rows, |mut b, row| {
            b.push_bind(row.user_id)
                .push_bind(row.enabled)
                .push_bind(row.status)
                .push_bind(row.requested_at)
                .push_bind(row.reviewed_at)
                .push_bind(row.reviewed_by)
                .push_bind(row.rejection_reason.clone());
        });
        builder.push(
            " ON CONFLICT (user_id) DO UPDATE SET enabled = EXCLUDED.enabled, \
             status = EXCLUDED.status, requested_at = EXCLUDED.requested_at, \
             reviewed_at = EXCLUDED.reviewed_at, reviewed_by = EXCLUDED.reviewed_by, \
             rejection_reason = EXCLUDED.rejection_reason",
        );

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save ladder rows", e))?;
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<LadderAuthorization>> {
        sqlx::query_as::<_, LadderAuthorization>(
            "SELECT * FROM ladder_authorizations \
             WHERE status = $1 AND ($2::uuid[] IS NULL OR user_id = ANY($2)) \
             ORDER BY requested_at ASC NULLS LAST",
        )
        .bind(status)
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list ladder rows", e))
    }
}
