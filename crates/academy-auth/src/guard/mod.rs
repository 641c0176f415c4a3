//! Guard layer: authenticate the caller and assert a privilege tier.
//!
//! Guards never decide which records the caller may touch. They hand back a
//! [`GuardContext`] whose scope helper answers that question.

pub mod context;

use std::sync::Arc;

use tracing::warn;

use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_entity::profile::{CanonicalRole, Profile, ProfileStatus};

pub use context::{Actor, GuardContext};

use crate::rbac::RoleAliasTable;
use crate::scope::ScopeHelper;
use crate::session::SessionManager;

/// Composes the session manager and role table into typed checks.
#[derive(Debug, Clone)]
pub struct Guard {
    sessions: Arc<SessionManager>,
    roles: Arc<RoleAliasTable>,
    scope: Arc<ScopeHelper>,
}

impl Guard {
    pub fn new(
        sessions: Arc<SessionManager>,
        roles: Arc<RoleAliasTable>,
        scope: Arc<ScopeHelper>,
    ) -> Self {
        Self {
            sessions,
            roles,
            scope,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn roles(&self) -> &Arc<RoleAliasTable> {
        &self.roles
    }

    pub fn scope_helper(&self) -> &Arc<ScopeHelper> {
        &self.scope
    }

    /// Any live session on an active account with a recognized role.
    ///
    /// `UNAUTHORIZED` for a missing, invalid, or superseded session; `FROZEN`
    /// for a frozen account; `FORBIDDEN` for an unrecognized role label.
    pub async fn require_system_user(&self, token: Option<&str>) -> AppResult<GuardContext> {
        let token = token.ok_or_else(|| AppError::unauthorized("Not signed in"))?;
        let profile = self.sessions.authenticate(token).await.map_err(|e| {
            if e.is(academy_core::ErrorKind::InvalidToken) {
                AppError::unauthorized(e.message)
            } else {
                e
            }
        })?;
        self.context_for(profile)
    }

    /// leader or super_admin.
    pub async fn require_admin(&self, token: Option<&str>) -> AppResult<GuardContext> {
        self.require(token, "admin", CanonicalRole::is_admin).await
    }

    pub async fn require_super_admin(&self, token: Option<&str>) -> AppResult<GuardContext> {
        self.require(token, "super_admin", |r| *r == CanonicalRole::SuperAdmin)
            .await
    }

    /// leader, super_admin, coach, or assistant.
    pub async fn require_manager(&self, token: Option<&str>) -> AppResult<GuardContext> {
        self.require(token, "manager", CanonicalRole::is_manager).await
    }

    /// student, trader, coach, or assistant.
    pub async fn require_learner(&self, token: Option<&str>) -> AppResult<GuardContext> {
        self.require(token, "learner", CanonicalRole::is_learner).await
    }

    pub async fn require_coach(&self, token: Option<&str>) -> AppResult<GuardContext> {
        self.require(token, "coach", |r| *r == CanonicalRole::Coach)
            .await
    }

    pub async fn require_assistant(&self, token: Option<&str>) -> AppResult<GuardContext> {
        self.require(token, "assistant", |r| *r == CanonicalRole::Assistant)
            .await
    }

    /// Builds a context for an already-resolved profile.
    pub fn context_for(&self, profile: Profile) -> AppResult<GuardContext> {
        match profile.status {
            ProfileStatus::Active => {}
            ProfileStatus::Frozen => return Err(AppError::frozen("Account is frozen")),
            ProfileStatus::Deleted => return Err(AppError::unauthorized("Session is not valid")),
        }

        let Some(role) = self.roles.normalize(&profile.role) else {
            warn!(
                user_id = %profile.id,
                label = %profile.role,
                "Refusing session with unrecognized role"
            );
            return Err(AppError::forbidden("Account role is not recognized"));
        };

        Ok(GuardContext::new(Actor { profile, role }, self.scope.clone()))
    }

    async fn require(
        &self,
        token: Option<&str>,
        tier: &str,
        allowed: impl Fn(&CanonicalRole) -> bool,
    ) -> AppResult<GuardContext> {
        let ctx = self.require_system_user(token).await?;
        ctx.require_role(tier, allowed)?;
        Ok(ctx)
    }
}
