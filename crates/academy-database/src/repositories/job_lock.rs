//! Job lock repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::job::JobLock;

/// Persistence for named job leases.
///
/// `try_acquire` must be a single atomic check-and-set: of any number of
/// concurrent callers that observe the lease as free, exactly one wins.
#[async_trait]
pub trait JobLockRepo: Send + Sync + std::fmt::Debug + 'static {
    /// Take the lease until `until` if it is free at `now`. Creates the row on
    /// first use.
    async fn try_acquire(
        &self,
        job_name: &str,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Clear the lease and record `error`. Returns `false` for an unknown job.
    async fn release(
        &self,
        job_name: &str,
        error: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    async fn find(&self, job_name: &str) -> AppResult<Option<JobLock>>;
}

/// PostgreSQL implementation of [`JobLockRepo`].
#[derive(Debug, Clone)]
pub struct PgJobLockRepository {
    pool: PgPool,
}

impl PgJobLockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobLockRepo for PgJobLockRepository {
    async fn try_acquire(
        &self,
        job_name: &str,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<bool> {
        // Conditional upsert: the row lock taken by ON CONFLICT serializes racers.
        let acquired = sqlx::query_scalar::<_, String>(
            "INSERT INTO job_locks (job_name, locked_until, last_error, updated_at) \
             VALUES ($1, $3, NULL, $2) \
             ON CONFLICT (job_name) DO UPDATE \
               SET locked_until = EXCLUDED.locked_until, updated_at = EXCLUDED.updated_at \
               WHERE job_locks.locked_until IS NULL OR job_locks.locked_until <= $2 \
             RETURNING job_name",
        )
        .bind(job_name)
        .bind(now)
        .bind(until)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire job lock", e))?;
        Ok(acquired.is_some())
    }

    async fn release(
        &self,
        job_name: &str,
        error: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE job_locks SET locked_until = NULL, last_error = $2, updated_at = $3 \
             WHERE job_name = $1",
        )
        .bind(job_name)
        .bind(error)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release job lock", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find(&self, job_name: &str) -> AppResult<Option<JobLock>> {
        sqlx::query_as::<_, JobLock>("SELECT * FROM job_locks WHERE job_name = $1")
            .bind(job_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find job lock", e))
    }
}
