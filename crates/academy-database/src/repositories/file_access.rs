//! File access request and permission repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::workflow::{FileAccessRequest, FilePermission, RequestStatus};

/// Persistence for restricted-file requests and the permissions they grant.
#[async_trait]
pub trait FileAccessRepo: Send + Sync + std::fmt::Debug + 'static {
    async fn find(&self, user_id: Uuid, file_id: Uuid) -> AppResult<Option<FileAccessRequest>>;

    /// Upsert on `(user_id, file_id)`.
    async fn save(&self, row: &FileAccessRequest) -> AppResult<()>;

    /// Rows in `status`, optionally restricted to `user_ids`.
    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<FileAccessRequest>>;

    /// Record a permission; an existing grant is kept.
    async fn grant(&self, permission: &FilePermission) -> AppResult<()>;

    /// Drop a grant. Returns `false` if none existed.
    async fn revoke(&self, user_id: Uuid, file_id: Uuid) -> AppResult<bool>;

    async fn has_permission(&self, user_id: Uuid, file_id: Uuid) -> AppResult<bool>;
}

/// PostgreSQL implementation of [`FileAccessRepo`].
#[derive(Debug, Clone)]
pub struct PgFileAccessRepository {
    pool: PgPool,
}

impl PgFileAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileAccessRepo for PgFileAccessRepository {
    async fn find(&self, user_id: Uuid, file_id: Uuid) -> AppResult<Option<FileAccessRequest>> {
        sqlx::query_as::<_, FileAccessRequest>(
            "SELECT * FROM file_access_requests WHERE user_id = $1 AND file_id = $2",
        )
        .bind(user_id)
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file request", e))
    }

    async fn save(&self, row: &FileAccessRequest) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO file_access_requests (id, user_id, file_id, status, requested_at, \
             reviewed_at, reviewed_by, rejection_reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (user_id, file_id) DO UPDATE SET status = EXCLUDED.status, \
             requested_at = EXCLUDED.requested_at, reviewed_at = EXCLUDED.reviewed_at, \
             reviewed_by = EXCLUDED.reviewed_by, rejection_reason = EXCLUDED.rejection_reason",
        )
        .bind(row.id)
        .bind(row.user_id)
        .bind(row.file_id)
        .bind(row.status)
        .bind(row.requested_at)
        .bind(row.reviewed_at)
        .bind(row.reviewed_by)
        .bind(&row.rejection_reason)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save file request", e))?;
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: RequestStatus,
        user_ids: Option<&[Uuid]>,
    ) -> AppResult<Vec<FileAccessRequest>> {
        sqlx::query_as::<_, FileAccessRequest>(
            "SELECT * FROM file_access_requests \
             WHERE status = $1 AND ($2::uuid[] IS NULL OR user_id = ANY($2)) \
             ORDER BY requested_at ASC",
        )
        .bind(status)
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list file requests", e))
    }

    async fn grant(&self, permission: &FilePermission) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO file_permissions (user_id, file_id, granted_by, granted_at) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (user_id, file_id) DO NOTHING",
        )
        .bind(permission.user_id)
        .bind(permission.file_id)
        .bind(permission.granted_by)
        .bind(permission.granted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to grant file access", e))?;
        Ok(())
    }

    async fn revoke(&self, user_id: Uuid, file_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM file_permissions WHERE user_id = $1 AND file_id = $2")
                .bind(user_id)
                .bind(file_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to revoke file access", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn has_permission(&self, user_id: Uuid, file_id: Uuid) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM file_permissions WHERE user_id = $1 AND file_id = $2)",
        )
        .bind(user_id)
        .bind(file_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check file access", e))
    }
}
