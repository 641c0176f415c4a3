//! Notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::notification::{Notification, NotificationKey};

/// Persistence for notifications.
#[async_trait]
pub trait NotificationRepo: Send + Sync + std::fmt::Debug + 'static {
    /// Batch insert. Returns the number of rows written.
    async fn insert_many(&self, rows: &[Notification]) -> AppResult<u64>;

    /// Newest first.
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>>;

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64>;

    /// Every unread row addressed to `user_id`, newest first.
    async fn find_unread(&self, user_id: Uuid) -> AppResult<Vec<Notification>>;

    /// Mark every unread row of `user_id` matching `key` as read.
    async fn mark_read_by_key(
        &self,
        user_id: Uuid,
        key: &NotificationKey,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete read rows created before `cutoff`.
    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// PostgreSQL implementation of [`NotificationRepo`].
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepo for PgNotificationRepository {
    async fn insert_many(&self, rows: &[Notification]) -> AppResult<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "INSERT INTO notifications (id, to_user_id, from_user_id, title, content, created_at, read_at) ",
        );
        builder.push_values(rows, |mut b, n| {
            b.push_bind(n.id)
                .push_bind(n.to_user_id)
                .push_bind(n.from_user_id)
                .push_bind(n.title.clone())
                .push_bind(n.content.clone())
                .push_bind(n.created_at)
                .push_bind(n.read_at);
        });

        let result = builder.build().execute(&self.pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert notifications", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE to_user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE to_user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count unread notifications", e)
        })
    }

    async fn find_unread(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE to_user_id = $1 AND read_at IS NULL \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load unread notifications", e)
        })
    }

    async fn mark_read_by_key(
        &self,
        user_id: Uuid,
        key: &NotificationKey,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read_at = $6 \
             WHERE to_user_id = $1 AND read_at IS NULL \
             AND from_user_id IS NOT DISTINCT FROM $2 AND title = $3 AND content = $4 \
             AND created_at = $5",
        )
        .bind(user_id)
        .bind(key.from_user_id)
        .bind(&key.title)
        .bind(&key.content)
        .bind(key.created_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark notifications read", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE read_at IS NOT NULL AND created_at < $1",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete old notifications", e)
        })?;
        Ok(result.rows_affected())
    }
}
