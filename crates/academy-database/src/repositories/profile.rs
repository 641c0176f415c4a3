//! Profile repository: accounts, embedded session fields, and tree edges.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use academy_core::error::{AppError, ErrorKind};
use academy_core::result::AppResult;
use academy_entity::profile::{Profile, ProfileStatus};

/// One parent pointer in the organizational tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TreeEdge {
    /// The child profile.
    pub id: Uuid,
    /// Its leader.
    pub leader_id: Uuid,
}

/// Persistence for [`Profile`] records.
#[async_trait]
pub trait ProfileRepo: Send + Sync + std::fmt::Debug + 'static {
    /// Find a profile by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>>;

    /// Find a profile by login name.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Profile>>;

    /// Insert a profile. A taken username fails with `INVALID_BODY`.
    async fn create(&self, profile: &Profile) -> AppResult<()>;

    /// Overwrite the session nonce. Returns `false` if the profile is absent.
    async fn set_session(
        &self,
        id: Uuid,
        session_id: Uuid,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Clear the session nonce and expiry.
    async fn clear_session(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool>;

    /// Clear every session whose expiry is at or before `now`.
    async fn clear_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Replace the password hash.
    async fn update_password(&self, id: Uuid, hash: &str, now: DateTime<Utc>) -> AppResult<bool>;

    /// Change the account status.
    async fn set_status(&self, id: Uuid, status: ProfileStatus, now: DateTime<Utc>)
    -> AppResult<bool>;

    /// Edges whose leader is one of `leader_ids`.
    async fn find_children(&self, leader_ids: &[Uuid]) -> AppResult<Vec<TreeEdge>>;

    /// Ids of profiles created by `creator_id`.
    async fn find_created_by(&self, creator_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Ids of active profiles whose normalized stored label is in `labels`.
    async fn find_active_ids_by_role_labels(&self, labels: &[String]) -> AppResult<Vec<Uuid>>;
}

/// PostgreSQL implementation of [`ProfileRepo`].
#[derive(Debug, Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepo for PgProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find profile by username", e)
            })
    }

    async fn create(&self, profile: &Profile) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO profiles (id, username, display_name, password_hash, role, leader_id, \
             created_by, status, session_id, session_expires_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(profile.id)
        .bind(&profile.username)
        .bind(&profile.display_name)
        .bind(&profile.password_hash)
        .bind(&profile.role)
        .bind(profile.leader_id)
        .bind(profile.created_by)
        .bind(profile.status)
        .bind(profile.session_id)
        .bind(profile.session_expires_at)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                AppError::invalid_body(format!("Username '{}' is taken", profile.username))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create profile", e)
            }
        })?;
        Ok(())
    }

    async fn set_session(
        &self,
        id: Uuid,
        session_id: Uuid,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE profiles SET session_id = $2, session_expires_at = $3, updated_at = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(session_id)
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_session(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE profiles SET session_id = NULL, session_expires_at = NULL, updated_at = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear session", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE profiles SET session_id = NULL, session_expires_at = NULL, updated_at = $1 \
             WHERE session_expires_at IS NOT NULL AND session_expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sweep expired sessions", e)
        })?;
        Ok(result.rows_affected())
    }

    async fn update_password(&self, id: Uuid, hash: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE profiles SET password_hash = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(hash)
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to update password", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ProfileStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE profiles SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set status", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_children(&self, leader_ids: &[Uuid]) -> AppResult<Vec<TreeEdge>> {
        sqlx::query_as::<_, TreeEdge>(
            "SELECT id, leader_id FROM profiles WHERE leader_id = ANY($1)",
        )
        .bind(leader_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load tree edges", e))
    }

    async fn find_created_by(&self, creator_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM profiles WHERE created_by = $1")
            .bind(creator_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load created profiles", e)
            })
    }

    async fn find_active_ids_by_role_labels(&self, labels: &[String]) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM profiles WHERE status = 'active' AND lower(btrim(role)) = ANY($1)",
        )
        .bind(labels)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profiles by role", e))
    }
}
