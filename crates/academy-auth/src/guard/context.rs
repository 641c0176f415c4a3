//! The authenticated caller and its scope.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_entity::profile::{CanonicalRole, Profile};

use crate::scope::{Scope, ScopeHelper};

/// A profile together with its normalized role.
#[derive(Debug, Clone)]
pub struct Actor {
    pub profile: Profile,
    pub role: CanonicalRole,
}

impl Actor {
    pub fn id(&self) -> Uuid {
        self.profile.id
    }
}

/// What a guard hands to the operation it protects.
#[derive(Debug, Clone)]
pub struct GuardContext {
    pub actor: Actor,
    scope: Arc<ScopeHelper>,
}

impl GuardContext {
    pub fn new(actor: Actor, scope: Arc<ScopeHelper>) -> Self {
        Self { actor, scope }
    }

    /// Resolves the actor's scope. Not cached; each call re-reads the store.
    pub async fn scope(&self) -> AppResult<Scope> {
        self.scope.scope_for(self.actor.id(), self.actor.role).await
    }

    /// `FORBIDDEN` unless `subject` is in the actor's scope.
    pub async fn ensure_in_scope(&self, subject: Uuid) -> AppResult<()> {
        if self.scope().await?.contains(subject) {
            Ok(())
        } else {
            debug!(user_id = %self.actor.id(), subject = %subject, "Subject out of scope");
            Err(AppError::forbidden("Subject is outside your scope"))
        }
    }

    /// `FORBIDDEN` unless the actor's role satisfies `allowed`.
    pub fn require_role(
        &self,
        tier: &str,
        allowed: impl Fn(&CanonicalRole) -> bool,
    ) -> AppResult<()> {
        if allowed(&self.actor.role) {
            return Ok(());
        }
        debug!(user_id = %self.actor.id(), role = %self.actor.role, tier, "Guard denied");
        Err(AppError::forbidden(format!(
            "Role '{}' is not permitted here; requires {tier}",
            self.actor.role
        )))
    }

    pub fn scope_helper(&self) -> &Arc<ScopeHelper> {
        &self.scope
    }
}
