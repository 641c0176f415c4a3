//! Account creation, status changes, password resets, and coach assignment.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use academy_auth::{GuardContext, PasswordHasher, PasswordValidator, RoleAliasTable, SessionManager};
use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::{AssignmentRepo, ProfileRepo};
use academy_entity::profile::{CanonicalRole, CoachAssignment, NewProfile, Profile, ProfileStatus};

/// Input for [`ProfileService::create_profile`].
#[derive(Debug, Clone)]
pub struct CreateProfileInput {
    pub username: String,
    pub password: String,
    pub role: String,
    pub display_name: Option<String>,
    pub leader_id: Option<Uuid>,
}

/// Administers profiles on behalf of managers.
#[derive(Debug, Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepo>,
    assignments: Arc<dyn AssignmentRepo>,
    sessions: Arc<SessionManager>,
    roles: Arc<RoleAliasTable>,
    hasher: PasswordHasher,
    validator: PasswordValidator,
    clock: Arc<dyn Clock>,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn ProfileRepo>,
        assignments: Arc<dyn AssignmentRepo>,
        sessions: Arc<SessionManager>,
        roles: Arc<RoleAliasTable>,
        hasher: PasswordHasher,
        validator: PasswordValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            profiles,
            assignments,
            sessions,
            roles,
            hasher,
            validator,
            clock,
        }
    }

    /// Creates an account below the caller.
    ///
    /// Only super admins may hand out manager roles. A leader creating a
    /// profile without a parent becomes its parent.
    pub async fn create_profile(
        &self,
        ctx: &GuardContext,
        input: CreateProfileInput,
    ) -> AppResult<Profile> {
        ctx.require_role("manager", CanonicalRole::is_manager)?;

        let username = input.username.trim();
        if username.is_empty() {
            return Err(AppError::invalid_body("Username must not be empty"));
        }

        let role = self
            .roles
            .normalize(&input.role)
            .ok_or_else(|| AppError::invalid_body(format!("Unknown role '{}'", input.role)))?;
        if ctx.actor.role != CanonicalRole::SuperAdmin && !role.is_plain_learner() {
            return Err(AppError::forbidden(format!(
                "Only a super admin may create '{role}' accounts"
            )));
        }

        self.validator.validate(&input.password)?;

        let leader_id = match input.leader_id {
            Some(leader_id) => {
                if self.profiles.find_by_id(leader_id).await?.is_none() {
                    return Err(AppError::not_found("Leader not found"));
                }
                if leader_id != ctx.actor.id() {
                    ctx.ensure_in_scope(leader_id).await?;
                }
                Some(leader_id)
            }
            None if ctx.actor.role == CanonicalRole::Leader => Some(ctx.actor.id()),
            None => None,
        };

        let profile = NewProfile {
            username: username.to_string(),
            display_name: input.display_name,
            password_hash: self.hasher.hash_password(&input.password)?,
            role: role.as_str().to_string(),
            leader_id,
            created_by: Some(ctx.actor.id()),
        }
        .into_profile(self.clock.now());

        self.profiles.create(&profile).await?;
        info!(
            user_id = %profile.id,
            created_by = %ctx.actor.id(),
            role = %role,
            "Profile created"
        );

        Ok(profile)
    }

    /// Returns a profile visible to the caller.
    pub async fn get_profile(&self, ctx: &GuardContext, user_id: Uuid) -> AppResult<Profile> {
        if user_id != ctx.actor.id() {
            ctx.ensure_in_scope(user_id).await?;
        }
        self.find(user_id).await
    }

    /// Super admin only. Existing sessions are revoked.
    pub async fn reset_password(
        &self,
        ctx: &GuardContext,
        user_id: Uuid,
        new_password: &str,
    ) -> AppResult<()> {
        ctx.require_role("super_admin", |r| *r == CanonicalRole::SuperAdmin)?;
        self.validator.validate(new_password)?;

        let hash = self.hasher.hash_password(new_password)?;
        if !self
            .profiles
            .update_password(user_id, &hash, self.clock.now())
            .await?
        {
            return Err(AppError::not_found("Profile not found"));
        }

        self.sessions.revoke(user_id).await?;
        info!(user_id = %user_id, reset_by = %ctx.actor.id(), "Password reset");
        Ok(())
    }

    /// Freezes, deletes, or reactivates an in-scope account.
    pub async fn set_status(
        &self,
        ctx: &GuardContext,
        user_id: Uuid,
        status: ProfileStatus,
    ) -> AppResult<Profile> {
        ctx.require_role("admin", CanonicalRole::is_admin)?;
        if user_id == ctx.actor.id() {
            return Err(AppError::forbidden("You cannot change your own status"));
        }
        ctx.ensure_in_scope(user_id).await?;

        let mut profile = self.find(user_id).await?;
        if profile.status == status {
            return Ok(profile);
        }

        let now = self.clock.now();
        self.profiles.set_status(user_id, status, now).await?;
        if status != ProfileStatus::Active {
            self.sessions.revoke(user_id).await?;
        }

        info!(
            user_id = %user_id,
            from = %profile.status,
            to = %status,
            changed_by = %ctx.actor.id(),
            "Profile status changed"
        );
        profile.status = status;
        profile.updated_at = now;
        Ok(profile)
    }

    pub async fn assign_coach(
        &self,
        ctx: &GuardContext,
        coach_id: Uuid,
        student_id: Uuid,
    ) -> AppResult<CoachAssignment> {
        self.check_assignment(ctx, coach_id, student_id).await?;

        let assignment = CoachAssignment {
            coach_id,
            student_id,
            created_at: self.clock.now(),
        };
        self.assignments.assign(&assignment).await?;
        info!(coach_id = %coach_id, student_id = %student_id, "Coach assigned");
        Ok(assignment)
    }

    /// Returns `false` when no such assignment existed.
    pub async fn unassign_coach(
        &self,
        ctx: &GuardContext,
        coach_id: Uuid,
        student_id: Uuid,
    ) -> AppResult<bool> {
        self.check_assignment(ctx, coach_id, student_id).await?;

        let removed = self.assignments.unassign(coach_id, student_id).await?;
        if removed {
            info!(coach_id = %coach_id, student_id = %student_id, "Coach unassigned");
        }
        Ok(removed)
    }

    async fn check_assignment(
        &self,
        ctx: &GuardContext,
        coach_id: Uuid,
        student_id: Uuid,
    ) -> AppResult<()> {
        ctx.require_role("admin", CanonicalRole::is_admin)?;
        ctx.ensure_in_scope(student_id).await?;

        let coach = self.find(coach_id).await?;
        if self.roles.normalize(&coach.role) != Some(CanonicalRole::Coach) {
            return Err(AppError::invalid_body("Target profile is not a coach"));
        }
        Ok(())
    }

    async fn find(&self, user_id: Uuid) -> AppResult<Profile> {
        self.profiles
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Profile not found"))
    }
}
