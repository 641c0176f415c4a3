//! Session lifecycle manager: issue, verify, resolve, revoke.
//!
//! A profile holds at most one live session nonce. Issuing a new session
//! overwrites it, so every older token stops resolving even though its
//! signature and expiry still verify.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use academy_core::config::SessionConfig;
use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::ProfileRepo;
use academy_entity::profile::{Profile, ProfileStatus};

use super::cookie::SessionCookie;
use crate::jwt::{Claims, JwtDecoder, JwtEncoder};
use crate::password::PasswordHasher;

/// Ten years.
const MAX_TTL_HOURS: u64 = 24 * 365 * 10;

/// Result of [`SessionManager::issue`].
#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub cookie: SessionCookie,
}

/// Manages the session fields embedded on [`Profile`].
#[derive(Clone)]
pub struct SessionManager {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    profiles: Arc<dyn ProfileRepo>,
    hasher: PasswordHasher,
    clock: Arc<dyn Clock>,
    config: SessionConfig,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionManager {
    pub fn new(
        encoder: JwtEncoder,
        decoder: JwtDecoder,
        profiles: Arc<dyn ProfileRepo>,
        hasher: PasswordHasher,
        clock: Arc<dyn Clock>,
        config: SessionConfig,
    ) -> Self {
        Self {
            encoder,
            decoder,
            profiles,
            hasher,
            clock,
            config,
        }
    }

    /// Session cookie settings.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Starts a new session for `uid`, superseding any previous one.
    pub async fn issue(&self, uid: Uuid) -> AppResult<IssuedSession> {
        let now = self.clock.now();
        let ttl = Duration::hours(self.config.ttl_hours.min(MAX_TTL_HOURS) as i64);
        let expires_at = now + ttl;
        let sid = Uuid::new_v4();

        if !self.profiles.set_session(uid, sid, expires_at, now).await? {
            return Err(AppError::not_found(format!("Profile {uid} not found")));
        }

        let token = self.encoder.encode(uid, sid, now, expires_at)?;
        let cookie = SessionCookie::new(&self.config, token.clone(), ttl.num_seconds());

        info!(user_id = %uid, session_id = %sid, expires_at = %expires_at, "Session issued");

        Ok(IssuedSession {
            token,
            session_id: sid,
            expires_at,
            cookie,
        })
    }

    /// Signature and expiry check only. Fails with `INVALID_TOKEN`.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        self.decoder.decode(token)
    }

    /// Loads the profile if `sid` is its live session. Fails with `UNAUTHORIZED`.
    pub async fn resolve(&self, uid: Uuid, sid: Uuid) -> AppResult<Profile> {
        let profile = self
            .profiles
            .find_by_id(uid)
            .await?
            .ok_or_else(|| AppError::unauthorized("Session is not valid"))?;

        if profile.status == ProfileStatus::Deleted {
            return Err(AppError::unauthorized("Session is not valid"));
        }

        if !profile.session_is_live(sid, self.clock.now()) {
            debug!(user_id = %uid, session_id = %sid, "Stale session");
            return Err(AppError::unauthorized("Session has been superseded or expired"));
        }

        Ok(profile)
    }

    /// [`verify`](Self::verify) followed by [`resolve`](Self::resolve).
    pub async fn authenticate(&self, token: &str) -> AppResult<Profile> {
        let claims = self.verify(token)?;
        self.resolve(claims.uid, claims.sid).await
    }

    /// Clears the session fields, killing every token for `uid`.
    pub async fn revoke(&self, uid: Uuid) -> AppResult<()> {
        self.profiles.clear_session(uid, self.clock.now()).await?;
        info!(user_id = %uid, "Session revoked");
        Ok(())
    }

    /// Password login. Frozen accounts fail with `FROZEN` only after the
    /// password has been verified.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(Profile, IssuedSession)> {
        let invalid = || AppError::unauthorized("Invalid username or password");

        let profile = self
            .profiles
            .find_by_username(username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !self.hasher.verify_password(password, &profile.password_hash)? {
            debug!(username = %profile.username, "Password mismatch");
            return Err(invalid());
        }

        match profile.status {
            ProfileStatus::Deleted => return Err(invalid()),
            ProfileStatus::Frozen => return Err(AppError::frozen("Account is frozen")),
            ProfileStatus::Active => {}
        }

        let session = self.issue(profile.id).await?;
        Ok((profile, session))
    }

    /// Ends the session carried by `token`.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        let profile = self.authenticate(token).await?;
        self.revoke(profile.id).await
    }

    /// Clears every session whose expiry has passed.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        let cleared = self.profiles.clear_expired_sessions(self.clock.now()).await?;
        if cleared > 0 {
            info!(cleared, "Expired sessions cleared");
        }
        Ok(cleared)
    }
}
