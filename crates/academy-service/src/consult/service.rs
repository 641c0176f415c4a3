//! Consult messages: scope-gated sending, read state, and recall.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use academy_auth::{GuardContext, RoleAliasTable};
use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::{ConsultRepo, ProfileRepo};
use academy_entity::consult::{ConsultMessage, ConversationSummary, RECALL_WINDOW_SECONDS};
use academy_entity::profile::ProfileStatus;

use crate::notification::NotificationService;

const DEFAULT_THREAD_LIMIT: i64 = 100;
const PREVIEW_CHARS: usize = 80;

/// Sends and reads consult messages.
#[derive(Debug, Clone)]
pub struct ConsultService {
    consult: Arc<dyn ConsultRepo>,
    profiles: Arc<dyn ProfileRepo>,
    roles: Arc<RoleAliasTable>,
    notifications: Arc<NotificationService>,
    clock: Arc<dyn Clock>,
}

impl ConsultService {
    pub fn new(
        consult: Arc<dyn ConsultRepo>,
        profiles: Arc<dyn ProfileRepo>,
        roles: Arc<RoleAliasTable>,
        notifications: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            consult,
            profiles,
            roles,
            notifications,
            clock,
        }
    }

    /// Whether the caller may open a conversation with `peer_id`.
    ///
    /// True when either party has the other in scope. Missing, inactive,
    /// or unrecognized peers are never consultable.
    pub async fn can_consult_with(&self, ctx: &GuardContext, peer_id: Uuid) -> AppResult<bool> {
        if peer_id == ctx.actor.id() {
            return Ok(false);
        }

        let Some(peer) = self.profiles.find_by_id(peer_id).await? else {
            return Ok(false);
        };
        if peer.status != ProfileStatus::Active {
            return Ok(false);
        }
        let Some(peer_role) = self.roles.normalize(&peer.role) else {
            return Ok(false);
        };

        if ctx.scope().await?.contains(peer_id) {
            return Ok(true);
        }
        let peer_scope = ctx.scope_helper().scope_for(peer_id, peer_role).await?;
        Ok(peer_scope.contains(ctx.actor.id()))
    }

    pub async fn send(
        &self,
        ctx: &GuardContext,
        peer_id: Uuid,
        content: &str,
    ) -> AppResult<ConsultMessage> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::invalid_body("Message must not be empty"));
        }
        if !self.can_consult_with(ctx, peer_id).await? {
            return Err(AppError::forbidden("You cannot consult with this user"));
        }

        let message = ConsultMessage {
            id: Uuid::new_v4(),
            from_user_id: ctx.actor.id(),
            to_user_id: peer_id,
            content: content.to_string(),
            created_at: self.clock.now(),
            read_at: None,
        };
        self.consult.insert(&message).await?;
        debug!(from = %message.from_user_id, to = %peer_id, "Consult message sent");

        let preview: String = content.chars().take(PREVIEW_CHARS).collect();
        self.notifications
            .notify(
                [peer_id],
                Some(ctx.actor.id()),
                &format!("New message from {}", ctx.actor.profile.username),
                &preview,
            )
            .await?;

        Ok(message)
    }

    /// Messages between the caller and `peer_id`, oldest first.
    pub async fn thread(
        &self,
        ctx: &GuardContext,
        peer_id: Uuid,
        limit: Option<i64>,
    ) -> AppResult<Vec<ConsultMessage>> {
        let limit = limit.unwrap_or(DEFAULT_THREAD_LIMIT).clamp(1, 500);
        self.consult.thread(ctx.actor.id(), peer_id, limit).await
    }

    /// Marks everything `peer_id` sent to the caller as read.
    pub async fn mark_thread_read(&self, ctx: &GuardContext, peer_id: Uuid) -> AppResult<u64> {
        self.consult
            .mark_read(peer_id, ctx.actor.id(), self.clock.now())
            .await
    }

    /// Re-flags the thread: clears `read_at` on everything `peer_id` sent to the caller.
    pub async fn mark_unread(&self, ctx: &GuardContext, peer_id: Uuid) -> AppResult<u64> {
        self.consult.mark_unread(peer_id, ctx.actor.id()).await
    }

    /// Deletes a message. Sender only, and only inside the recall window.
    pub async fn recall(&self, ctx: &GuardContext, message_id: Uuid) -> AppResult<()> {
        let message = self
            .consult
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| AppError::not_found("Message not found"))?;

        if message.from_user_id != ctx.actor.id() {
            return Err(AppError::forbidden("Only the sender can recall a message"));
        }
        if !message.within_recall_window(self.clock.now()) {
            return Err(AppError::recall_expired(format!(
                "Messages can only be recalled within {} minutes",
                RECALL_WINDOW_SECONDS / 60
            )));
        }

        self.consult.delete(message_id).await?;
        info!(user_id = %ctx.actor.id(), message_id = %message_id, "Consult message recalled");
        Ok(())
    }

    /// Sidebar summary: unread count and last activity per partner.
    pub async fn unread_by_peer(&self, ctx: &GuardContext) -> AppResult<Vec<ConversationSummary>> {
        self.consult.unread_by_peer(ctx.actor.id()).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::testing::Harness;

    #[tokio::test]
    async fn test_recall_window_and_ownership() {
        let h = Harness::new();
        let leader = h.profile("lead", "leader", None).await;
        let student = h.profile("stu", "student", Some(leader.id)).await;
        let consult = &h.services.consult;

        let first = consult.send(&h.ctx(&student), leader.id, "one").await.unwrap();
        let second = consult.send(&h.ctx(&student), leader.id, "two").await.unwrap();

        h.clock.advance(Duration::seconds(4 * 60 + 59));
        let err = consult.recall(&h.ctx(&leader), first.id).await.unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        consult.recall(&h.ctx(&student), first.id).await.unwrap();

        h.clock.advance(Duration::seconds(2));
        let err = consult.recall(&h.ctx(&student), second.id).await.unwrap_err();
        assert_eq!(err.code(), "RECALL_EXPIRED");
        let err = consult.recall(&h.ctx(&leader), second.id).await.unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");

        let err = consult.recall(&h.ctx(&student), first.id).await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_consult_permission_is_symmetric_over_scope() {
        let h = Harness::new();
        let leader = h.profile("lead", "leader", None).await;
        let member = h.profile("member", "student", Some(leader.id)).await;
        let outsider = h.profile("outsider", "student", None).await;
        let root = h.profile("root", "super_admin", None).await;
        let consult = &h.services.consult;

        assert!(consult.can_consult_with(&h.ctx(&leader), member.id).await.unwrap());
        assert!(consult.can_consult_with(&h.ctx(&member), leader.id).await.unwrap());
        assert!(consult.can_consult_with(&h.ctx(&outsider), root.id).await.unwrap());
        assert!(!consult.can_consult_with(&h.ctx(&member), outsider.id).await.unwrap());
        assert!(!consult.can_consult_with(&h.ctx(&member), member.id).await.unwrap());

        let err = consult
            .send(&h.ctx(&member), outsider.id, "hi")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_read_state_and_sidebar() {
        let h = Harness::new();
        let leader = h.profile("lead", "leader", None).await;
        let student = h.profile("stu", "student", Some(leader.id)).await;
        let consult = &h.services.consult;
        let (me, boss) = (h.ctx(&student), h.ctx(&leader));

        consult.send(&boss, student.id, "hello").await.unwrap();
        h.clock.advance(Duration::seconds(1));
        consult.send(&boss, student.id, "are you there").await.unwrap();

        let sidebar = consult.unread_by_peer(&me).await.unwrap();
        assert_eq!(sidebar.len(), 1);
        assert_eq!((sidebar[0].peer_id, sidebar[0].unread), (leader.id, 2));

        assert_eq!(consult.mark_thread_read(&me, leader.id).await.unwrap(), 2);
        assert_eq!(consult.unread_by_peer(&me).await.unwrap()[0].unread, 0);

        assert_eq!(consult.mark_unread(&me, leader.id).await.unwrap(), 2);
        assert_eq!(consult.unread_by_peer(&me).await.unwrap()[0].unread, 2);

        let thread = consult.thread(&me, leader.id, None).await.unwrap();
        assert_eq!(thread.len(), 2);
        assert_eq!(thread[0].content, "hello");

        // Sending also notifies the recipient.
        assert_eq!(h.services.notifications.count_unread(&me).await.unwrap(), 2);
    }
}
