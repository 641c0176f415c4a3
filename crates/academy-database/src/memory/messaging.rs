use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use academy_core::result::AppResult;
use academy_entity::consult::{ConsultMessage, ConversationSummary};
use academy_entity::notification::{Notification, NotificationKey};

use super::MemoryDatabase;
use crate::repositories::{ConsultRepo, NotificationRepo};

#[async_trait]
impl NotificationRepo for MemoryDatabase {
    async fn insert_many(&self, rows: &[Notification]) -> AppResult<u64> {
        let mut tables = self.tables().await?;
        tables.notifications.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Notification>> {
        let tables = self.tables().await?;
        let mut rows: Vec<_> = tables
            .notifications
            .iter()
            .filter(|n| n.to_user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn count_unread(&self, user_id: Uuid) -> AppResult<i64> {
        let tables = self.tables().await?;
        let count = tables
            .notifications
            .iter()
            .filter(|n| n.to_user_id == user_id && n.read_at.is_none())
            .count();
        Ok(count as i64)
    }

    async fn find_unread(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let tables = self.tables().await?;
        let mut rows: Vec<_> = tables
            .notifications
            .iter()
            .filter(|n| n.to_user_id == user_id && n.read_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_read_by_key(
        &self,
        user_id: Uuid,
        key: &NotificationKey,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut tables = self.tables().await?;
        let mut marked = 0;
        for n in tables.notifications.iter_mut() {
            if n.to_user_id == user_id && n.read_at.is_none() && n.matches(key) {
                n.read_at = Some(now);
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables().await?;
        let before = tables.notifications.len();
        tables
            .notifications
            .retain(|n| n.read_at.is_none() || n.created_at >= cutoff);
        Ok((before - tables.notifications.len()) as u64)
    }
}

#[async_trait]
impl ConsultRepo for MemoryDatabase {
    async fn insert(&self, message: &ConsultMessage) -> AppResult<()> {
        self.tables().await?.consult.push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ConsultMessage>> {
        let tables = self.tables().await?;
        Ok(tables.consult.iter().find(|m| m.id == id).cloned())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        let before = tables.consult.len();
        tables.consult.retain(|m| m.id != id);
        Ok(tables.consult.len() < before)
    }

    async fn thread(&self, a: Uuid, b: Uuid, limit: i64) -> AppResult<Vec<ConsultMessage>> {
        let tables = self.tables().await?;
        let mut rows: Vec<_> = tables
            .consult
            .iter()
            .filter(|m| {
                (m.from_user_id == a && m.to_user_id == b)
                    || (m.from_user_id == b && m.to_user_id == a)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.created_at);
        let limit = usize::try_from(limit).unwrap_or(0);
        let skip = rows.len().saturating_sub(limit);
        Ok(rows.split_off(skip))
    }

    async fn mark_read(&self, from: Uuid, to: Uuid, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables().await?;
        let mut marked = 0;
        for m in tables.consult.iter_mut() {
            if m.from_user_id == from && m.to_user_id == to && m.read_at.is_none() {
                m.read_at = Some(now);
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn mark_unread(&self, from: Uuid, to: Uuid) -> AppResult<u64> {
        let mut tables = self.tables().await?;
        let mut marked = 0;
        for m in tables.consult.iter_mut() {
            if m.from_user_id == from && m.to_user_id == to && m.read_at.is_some() {
                m.read_at = None;
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn unread_by_peer(&self, user_id: Uuid) -> AppResult<Vec<ConversationSummary>> {
        let tables = self.tables().await?;
        let mut by_peer: HashMap<Uuid, ConversationSummary> = HashMap::new();
        for m in &tables.consult {
            if m.from_user_id != user_id && m.to_user_id != user_id {
                continue;
            }
            let peer_id = m.partner_of(user_id);
            let entry = by_peer.entry(peer_id).or_insert(ConversationSummary {
                peer_id,
                unread: 0,
                last_activity: m.created_at,
            });
            if m.to_user_id == user_id && m.read_at.is_none() {
                entry.unread += 1;
            }
            entry.last_activity = entry.last_activity.max(m.created_at);
        }
        let mut summaries: Vec<_> = by_peer.into_values().collect();
        summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(summaries)
    }
}
