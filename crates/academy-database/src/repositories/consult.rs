//! Consult message repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::consult::{ConsultMessage, ConversationSummary};

/// Persistence for consult messages.
#[async_trait]
pub trait ConsultRepo: Send + Sync + std::fmt::Debug + 'static {
    async fn insert(&self, message: &ConsultMessage) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ConsultMessage>>;

    /// Hard delete. Returns `false` when the row was already gone.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Messages between `a` and `b` in either direction, oldest first, capped at `limit`
    /// most recent.
    async fn thread(&self, a: Uuid, b: Uuid, limit: i64) -> AppResult<Vec<ConsultMessage>>;

    /// Mark unread messages from `from` to `to` as read.
    async fn mark_read(&self, from: Uuid, to: Uuid, now: DateTime<Utc>) -> AppResult<u64>;

    /// Clear `read_at` on messages from `from` to `to`.
    async fn mark_unread(&self, from: Uuid, to: Uuid) -> AppResult<u64>;

    /// One entry per conversation partner of `user_id`, most recent activity first.
    async fn unread_by_peer(&self, user_id: Uuid) -> AppResult<Vec<ConversationSummary>>;
}

/// PostgreSQL implementation of [`ConsultRepo`].
#[derive(Debug, Clone)]
pub struct PgConsultRepository {
    pool: PgPool,
}

impl PgConsultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConsultRepo for PgConsultRepository {
    async fn insert(&self, message: &ConsultMessage) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO consult_messages (id, from_user_id, to_user_id, content, created_at, read_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(message.id)
        .bind(message.from_user_id)
        .bind(message.to_user_id)
        .bind(&message.content)
        .bind(message.created_at)
        .bind(message.read_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to send message", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ConsultMessage>> {
        sqlx::query_as::<_, ConsultMessage>("SELECT * FROM consult_messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find message", e))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM consult_messages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete message", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn thread(&self, a: Uuid, b: Uuid, limit: i64) -> AppResult<Vec<ConsultMessage>> {
        sqlx::query_as::<_, ConsultMessage>(
            "SELECT * FROM ( \
               SELECT * FROM consult_messages \
               WHERE (from_user_id = $1 AND to_user_id = $2) \
                  OR (from_user_id = $2 AND to_user_id = $1) \
               ORDER BY created_at DESC LIMIT $3 \
             ) recent ORDER BY created_at ASC",
        )
        .bind(a)
        .bind(b)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load thread", e))
    }

    async fn mark_read(&self, from: Uuid, to: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE consult_messages SET read_at = $3 \
             WHERE from_user_id = $1 AND to_user_id = $2 AND read_at IS NULL",
        )
        .bind(from)
        .bind(to)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark thread read", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_unread(&self, from: Uuid, to: Uuid) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE consult_messages SET read_at = NULL \
             WHERE from_user_id = $1 AND to_user_id = $2 AND read_at IS NOT NULL",
        )
        .bind(from)
        .bind(to)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark thread unread", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn unread_by_peer(&self, user_id: Uuid) -> AppResult<Vec<ConversationSummary>> {
        sqlx::query_as::<_, ConversationSummary>(
            "SELECT \
               CASE WHEN from_user_id = $1 THEN to_user_id ELSE from_user_id END AS peer_id, \
               COUNT(*) FILTER (WHERE to_user_id = $1 AND read_at IS NULL) AS unread, \
               MAX(created_at) AS last_activity \
             FROM consult_messages \
             WHERE from_user_id = $1 OR to_user_id = $1 \
             GROUP BY 1 \
             ORDER BY last_activity DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to summarize conversations", e)
        })
    }
}
