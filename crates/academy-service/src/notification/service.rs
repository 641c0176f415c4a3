//! Notification fan-out, unread counting, and grouped read transitions.
//!
//! Rows are never marked read by id. A read transition applies to every
//! unread row of the caller sharing the `(from_user_id, title, content,
//! created_at)` key, so two coincidentally identical notifications are read
//! together.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use academy_auth::{GuardContext, RoleAliasTable};
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::{NotificationRepo, ProfileRepo};
use academy_entity::notification::{Notification, NotificationKey};
use academy_entity::profile::{CanonicalRole, Profile};

/// Default page size for notification listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Writes and reads notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationRepo>,
    profiles: Arc<dyn ProfileRepo>,
    roles: Arc<RoleAliasTable>,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    pub fn new(
        notifications: Arc<dyn NotificationRepo>,
        profiles: Arc<dyn ProfileRepo>,
        roles: Arc<RoleAliasTable>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            profiles,
            roles,
            clock,
        }
    }

    /// Inserts one row per distinct target, all stamped with the same instant.
    pub async fn notify(
        &self,
        targets: impl IntoIterator<Item = Uuid>,
        from: Option<Uuid>,
        title: &str,
        content: &str,
    ) -> AppResult<u64> {
        let targets: BTreeSet<Uuid> = targets.into_iter().collect();
        if targets.is_empty() {
            return Ok(0);
        }

        let now = self.clock.now();
        let rows: Vec<Notification> = targets
            .into_iter()
            .map(|to_user_id| Notification {
                id: Uuid::new_v4(),
                to_user_id,
                from_user_id: from,
                title: title.to_string(),
                content: content.to_string(),
                created_at: now,
                read_at: None,
            })
            .collect();

        let inserted = self.notifications.insert_many(&rows).await?;
        debug!(from = ?from, title, recipients = inserted, "Notifications sent");
        Ok(inserted)
    }

    /// Notifies the actor's leader and every active super_admin.
    pub async fn notify_up(&self, actor: &Profile, title: &str, content: &str) -> AppResult<u64> {
        let labels = self.roles.labels_for(CanonicalRole::SuperAdmin);
        let mut targets: HashSet<Uuid> = self
            .profiles
            .find_active_ids_by_role_labels(&labels)
            .await?
            .into_iter()
            .collect();
        targets.extend(actor.leader_id);
        targets.remove(&actor.id);

        self.notify(targets, Some(actor.id), title, content).await
    }

    pub async fn count_unread(&self, ctx: &GuardContext) -> AppResult<i64> {
        self.notifications.count_unread(ctx.actor.id()).await
    }

    /// Newest first.
    pub async fn list(&self, ctx: &GuardContext, limit: Option<i64>) -> AppResult<Vec<Notification>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 500);
        self.notifications.list_for_user(ctx.actor.id(), limit).await
    }

    /// Marks every unread row of the caller matching `key`. Returns rows updated.
    pub async fn mark_read(&self, ctx: &GuardContext, key: &NotificationKey) -> AppResult<u64> {
        self.notifications
            .mark_read_by_key(ctx.actor.id(), key, self.clock.now())
            .await
    }

    /// Groups the caller's unread rows by key and marks each group.
    /// Returns the number of groups updated.
    pub async fn mark_all_read(&self, ctx: &GuardContext) -> AppResult<u64> {
        let user_id = ctx.actor.id();
        let unread = self.notifications.find_unread(user_id).await?;

        let mut seen = HashSet::new();
        let groups: Vec<NotificationKey> = unread
            .iter()
            .map(Notification::key)
            .filter(|key| seen.insert(key.clone()))
            .collect();

        let now = self.clock.now();
        let mut updated = 0;
        for key in &groups {
            if self.notifications.mark_read_by_key(user_id, key, now).await? > 0 {
                updated += 1;
            }
        }

        info!(user_id = %user_id, groups = updated, "Notifications marked read");
        Ok(updated)
    }

    /// Deletes read notifications created before `cutoff`.
    pub async fn purge_read_before(&self, cutoff: chrono::DateTime<chrono::Utc>) -> AppResult<u64> {
        self.notifications.delete_read_before(cutoff).await
    }
}
