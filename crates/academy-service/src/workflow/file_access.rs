//! Restricted file access requests.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use academy_auth::GuardContext;
use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::FileAccessRepo;
use academy_entity::profile::CanonicalRole;
use academy_entity::workflow::{
    FileAccessRequest, FilePermission, RequestStatus, ReviewDecision,
};

use super::{decision_verb, listing_filter, reason_for};
use crate::notification::NotificationService;

/// One request per `(user, file)`; approval records a permission grant.
#[derive(Debug, Clone)]
pub struct FileAccessService {
    file_access: Arc<dyn FileAccessRepo>,
    notifications: Arc<NotificationService>,
    clock: Arc<dyn Clock>,
}

impl FileAccessService {
    pub fn new(
        file_access: Arc<dyn FileAccessRepo>,
        notifications: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            file_access,
            notifications,
            clock,
        }
    }

    pub async fn request(&self, ctx: &GuardContext, file_id: Uuid) -> AppResult<FileAccessRequest> {
        ctx.require_role("learner", CanonicalRole::is_learner)?;
        let user_id = ctx.actor.id();
        let now = self.clock.now();

        let row = match self.file_access.find(user_id, file_id).await? {
            None => FileAccessRequest::requested(user_id, file_id, now),
            Some(mut row) if row.status == RequestStatus::Rejected => {
                row.status = RequestStatus::Requested;
                row.requested_at = now;
                row.reviewed_at = None;
                row.reviewed_by = None;
                row.rejection_reason = None;
                row
            }
            Some(row) => return Ok(row),
        };

        self.file_access.save(&row).await?;
        info!(user_id = %user_id, file_id = %file_id, "File access requested");

        self.notifications
            .notify_up(
                &ctx.actor.profile,
                "File access request",
                &format!("{} requested access to file {file_id}", ctx.actor.profile.username),
            )
            .await?;

        Ok(row)
    }

    pub async fn review(
        &self,
        ctx: &GuardContext,
        user_id: Uuid,
        file_id: Uuid,
        decision: ReviewDecision,
        reason: Option<String>,
    ) -> AppResult<FileAccessRequest> {
        ctx.require_role("manager", CanonicalRole::is_manager)?;
        ctx.ensure_in_scope(user_id).await?;

        let mut row = self
            .file_access
            .find(user_id, file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No request for file {file_id}")))?;

        let target = decision.target_status();
        if row.status == target {
            return Ok(row);
        }

        let now = self.clock.now();
        let previous = row.status;
        row.status = target;
        row.reviewed_at = Some(now);
        row.reviewed_by = Some(ctx.actor.id());
        row.rejection_reason = reason_for(decision, reason);
        self.file_access.save(&row).await?;

        if decision == ReviewDecision::Approve {
            self.file_access
                .grant(&FilePermission {
                    user_id,
                    file_id,
                    granted_by: Some(ctx.actor.id()),
                    granted_at: now,
                })
                .await?;
        } else if previous == RequestStatus::Approved {
            self.file_access.revoke(user_id, file_id).await?;
            info!(user_id = %user_id, file_id = %file_id, "File access revoked");
        }

        let verb = decision_verb(decision);
        info!(reviewer = %ctx.actor.id(), user_id = %user_id, file_id = %file_id, decision = verb, "File access reviewed");

        self.notifications
            .notify(
                [user_id],
                Some(ctx.actor.id()),
                "File access review",
                &format!("Your request for file {file_id} was {verb}"),
            )
            .await?;

        Ok(row)
    }

    /// Whether the caller holds a grant for `file_id`.
    pub async fn has_access(&self, ctx: &GuardContext, file_id: Uuid) -> AppResult<bool> {
        self.file_access.has_permission(ctx.actor.id(), file_id).await
    }

    pub async fn list_pending(&self, ctx: &GuardContext) -> AppResult<Vec<FileAccessRequest>> {
        match listing_filter(ctx).await? {
            None => Ok(Vec::new()),
            Some(filter) => {
                self.file_access
                    .list_by_status(RequestStatus::Requested, filter.as_deref())
                    .await
            }
        }
    }
}
