//! Leaderboard viewing authorization.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use academy_auth::GuardContext;
use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::{LadderRepo, ProfileRepo};
use academy_entity::profile::CanonicalRole;
use academy_entity::workflow::{LadderAuthorization, RequestStatus, ReviewDecision};

use super::{decision_verb, listing_filter, reason_for};
use crate::notification::NotificationService;

/// One authorization row per learner, reviewed in bulk.
#[derive(Debug, Clone)]
pub struct LadderService {
    ladder: Arc<dyn LadderRepo>,
    profiles: Arc<dyn ProfileRepo>,
    notifications: Arc<NotificationService>,
    clock: Arc<dyn Clock>,
}

impl LadderService {
    pub fn new(
        ladder: Arc<dyn LadderRepo>,
        profiles: Arc<dyn ProfileRepo>,
        notifications: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ladder,
            profiles,
            notifications,
            clock,
        }
    }

    /// The caller's own row.
    pub async fn status(&self, ctx: &GuardContext) -> AppResult<Option<LadderAuthorization>> {
        self.ladder.find(ctx.actor.id()).await
    }

    /// Creates a `requested` row or resets a rejected one, clearing `enabled`.
    pub async fn request(&self, ctx: &GuardContext) -> AppResult<LadderAuthorization> {
        ctx.require_role("learner", CanonicalRole::is_learner)?;
        let user_id = ctx.actor.id();
        let now = self.clock.now();

        let row = match self.ladder.find(user_id).await? {
            None => LadderAuthorization::requested(user_id, now),
            Some(row) if row.status == RequestStatus::Rejected => {
                LadderAuthorization::requested(user_id, now)
            }
            Some(row) => return Ok(row),
        };

        self.ladder.upsert_many(std::slice::from_ref(&row)).await?;
        info!(user_id = %user_id, "Ladder access requested");

        self.notifications
            .notify_up(
                &ctx.actor.profile,
                "Ladder access request",
                &format!("{} requested leaderboard access", ctx.actor.profile.username),
            )
            .await?;

        Ok(row)
    }

    /// Applies one decision to many learners at once.
    ///
    /// The whole batch is refused with `FORBIDDEN` if any user is out of
    /// scope and with `NOT_FOUND` if any user has no profile. Users already in the target state (with the same reason) are
    /// left alone and not notified. Returns the resulting row of every user.
    pub async fn review(
        &self,
        ctx: &GuardContext,
        user_ids: &[Uuid],
        decision: ReviewDecision,
        reason: Option<String>,
    ) -> AppResult<Vec<LadderAuthorization>> {
        ctx.require_role("manager", CanonicalRole::is_manager)?;
        let user_ids: BTreeSet<Uuid> = user_ids.iter().copied().collect();
        if user_ids.is_empty() {
            return Err(AppError::invalid_body("No users to review"));
        }

        let scope = ctx.scope().await?;
        if let Some(outside) = user_ids.iter().find(|id| !scope.contains(**id)) {
            return Err(AppError::forbidden(format!(
                "User {outside} is outside your scope"
            )));
        }
        for user_id in &user_ids {
            if self.profiles.find_by_id(*user_id).await?.is_none() {
                return Err(AppError::not_found(format!("User {user_id} not found")));
            }
        }

        let now = self.clock.now();
        let target = decision.target_status();
        let reason = reason_for(decision, reason);
        let mut results = Vec::with_capacity(user_ids.len());
        let mut changed = Vec::new();

        for user_id in user_ids {
            let existing = self.ladder.find(user_id).await?;
            if let Some(row) = &existing {
                if row.status == target && row.rejection_reason == reason {
                    results.push(row.clone());
                    continue;
                }
            }

            let row = LadderAuthorization {
                user_id,
                enabled: target == RequestStatus::Approved,
                status: target,
                requested_at: existing.and_then(|r| r.requested_at),
                reviewed_at: Some(now),
                reviewed_by: Some(ctx.actor.id()),
                rejection_reason: reason.clone(),
            };
            changed.push(row.clone());
            results.push(row);
        }

        if changed.is_empty() {
            return Ok(results);
        }

        self.ladder.upsert_many(&changed).await?;
        let verb = decision_verb(decision);
        info!(reviewer = %ctx.actor.id(), count = changed.len(), decision = verb, "Ladder access reviewed");

        let content = match &reason {
            Some(reason) => format!("Your leaderboard access was {verb}: {reason}"),
            None => format!("Your leaderboard access was {verb}"),
        };
        self.notifications
            .notify(
                changed.iter().map(|r| r.user_id),
                Some(ctx.actor.id()),
                "Ladder access review",
                &content,
            )
            .await?;

        Ok(results)
    }

    /// Pending requests within the reviewer's scope.
    pub async fn list_pending(&self, ctx: &GuardContext) -> AppResult<Vec<LadderAuthorization>> {
        match listing_filter(ctx).await? {
            None => Ok(Vec::new()),
            Some(filter) => {
                self.ladder
                    .list_by_status(RequestStatus::Requested, filter.as_deref())
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_review_without_prior_row() {
        let h = Harness::new();
        let root = h.profile("root", "super_admin", None).await;
        let student = h.profile("stu", "student", None).await;
        let ladder = &h.services.ladder;
        let admin = h.ctx(&root);

        let rows = ladder
            .review(&admin, &[student.id], ReviewDecision::Approve, None)
            .await
            .unwrap();
        assert_eq!(rows[0].status, RequestStatus::Approved);
        assert!(rows[0].enabled);

        let rows = ladder
            .review(&admin, &[student.id], ReviewDecision::Reject, Some("X".into()))
            .await
            .unwrap();
        assert!(!rows[0].enabled);
        assert_eq!(rows[0].rejection_reason.as_deref(), Some("X"));

        let stored = ladder.status(&h.ctx(&student)).await.unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Rejected);
        assert!(!stored.enabled);
    }

    #[tokio::test]
    async fn test_request_resets_rejection() {
        let h = Harness::new();
        let leader = h.profile("lead", "leader", None).await;
        let student = h.profile("stu", "student", Some(leader.id)).await;
        let ladder = &h.services.ladder;
        let me = h.ctx(&student);

        ladder.request(&me).await.unwrap();
        ladder
            .review(&h.ctx(&leader), &[student.id], ReviewDecision::Reject, Some("later".into()))
            .await
            .unwrap();

        let row = ladder.request(&me).await.unwrap();
        assert_eq!(row.status, RequestStatus::Requested);
        assert!(!row.enabled);
        assert!(row.rejection_reason.is_none());
        assert!(row.reviewed_by.is_none());
    }

    #[tokio::test]
    async fn test_bulk_review_is_all_or_nothing() {
        let h = Harness::new();
        let leader = h.profile("lead", "leader", None).await;
        let member = h.profile("member", "student", Some(leader.id)).await;
        let outsider = h.profile("outsider", "student", None).await;
        let ladder = &h.services.ladder;
        let boss = h.ctx(&leader);

        let err = ladder
            .review(&boss, &[member.id, outsider.id], ReviewDecision::Approve, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        assert!(ladder.status(&h.ctx(&member)).await.unwrap().is_none());

        let err = ladder
            .review(&boss, &[], ReviewDecision::Approve, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_unknown_user_fails_whole_batch() {
        let h = Harness::new();
        let root = h.profile("root", "super_admin", None).await;
        let student = h.profile("stu", "student", None).await;
        let ladder = &h.services.ladder;

        let err = ladder
            .review(&h.ctx(&root), &[student.id, Uuid::new_v4()], ReviewDecision::Approve, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
        assert!(ladder.status(&h.ctx(&student)).await.unwrap().is_none());
        assert_eq!(h.services.notifications.count_unread(&h.ctx(&student)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_each_affected_user_is_notified_once() {
        let h = Harness::new();
        let leader = h.profile("lead", "leader", None).await;
        let a = h.profile("a", "student", Some(leader.id)).await;
        let b = h.profile("b", "trader", Some(leader.id)).await;
        let ladder = &h.services.ladder;
        let boss = h.ctx(&leader);

        ladder
            .review(&boss, &[a.id, b.id, a.id], ReviewDecision::Approve, None)
            .await
            .unwrap();
        ladder
            .review(&boss, &[a.id], ReviewDecision::Approve, None)
            .await
            .unwrap();

        let notifications = &h.services.notifications;
        assert_eq!(notifications.count_unread(&h.ctx(&a)).await.unwrap(), 1);
        assert_eq!(notifications.count_unread(&h.ctx(&b)).await.unwrap(), 1);
        assert_eq!(ladder.list_pending(&boss).await.unwrap().len(), 0);
    }
}
