use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_entity::profile::{CoachAssignment, Profile, ProfileStatus};

use super::MemoryDatabase;
use crate::repositories::{AssignmentRepo, ProfileRepo, TreeEdge};

#[async_trait]
impl ProfileRepo for MemoryDatabase {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Profile>> {
        Ok(self.tables().await?.profiles.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Profile>> {
        let tables = self.tables().await?;
        Ok(tables
            .profiles
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn create(&self, profile: &Profile) -> AppResult<()> {
        let mut tables = self.tables().await?;
        if tables
            .profiles
            .values()
            .any(|p| p.username == profile.username)
        {
            return Err(AppError::invalid_body(format!(
                "Username '{}' is taken",
                profile.username
            )));
        }
        tables.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn set_session(
        &self,
        id: Uuid,
        session_id: Uuid,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        Ok(match tables.profiles.get_mut(&id) {
            Some(p) => {
                p.session_id = Some(session_id);
                p.session_expires_at = Some(expires_at);
                p.updated_at = now;
                true
            }
            None => false,
        })
    }

    async fn clear_session(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        Ok(match tables.profiles.get_mut(&id) {
            Some(p) => {
                p.session_id = None;
                p.session_expires_at = None;
                p.updated_at = now;
                true
            }
            None => false,
        })
    }

    async fn clear_expired_sessions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables().await?;
        let mut cleared = 0;
        for p in tables.profiles.values_mut() {
            if p.session_expires_at.is_some_and(|exp| exp <= now) {
                p.session_id = None;
                p.session_expires_at = None;
                p.updated_at = now;
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn update_password(&self, id: Uuid, hash: &str, now: DateTime<Utc>) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        Ok(match tables.profiles.get_mut(&id) {
            Some(p) => {
                p.password_hash = hash.to_string();
                p.updated_at = now;
                true
            }
            None => false,
        })
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: ProfileStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        Ok(match tables.profiles.get_mut(&id) {
            Some(p) => {
                p.status = status;
                p.updated_at = now;
                true
            }
            None => false,
        })
    }

    async fn find_children(&self, leader_ids: &[Uuid]) -> AppResult<Vec<TreeEdge>> {
        let tables = self.tables().await?;
        Ok(tables
            .profiles
            .values()
            .filter_map(|p| match p.leader_id {
                Some(leader_id) if leader_ids.contains(&leader_id) => Some(TreeEdge {
                    id: p.id,
                    leader_id,
                }),
                _ => None,
            })
            .collect())
    }

    async fn find_created_by(&self, creator_id: Uuid) -> AppResult<Vec<Uuid>> {
        let tables = self.tables().await?;
        Ok(tables
            .profiles
            .values()
            .filter(|p| p.created_by == Some(creator_id))
            .map(|p| p.id)
            .collect())
    }

    async fn find_active_ids_by_role_labels(&self, labels: &[String]) -> AppResult<Vec<Uuid>> {
        let tables = self.tables().await?;
        Ok(tables
            .profiles
            .values()
            .filter(|p| p.status == ProfileStatus::Active)
            .filter(|p| {
                let label = p.role.trim().to_lowercase();
                labels.iter().any(|l| *l == label)
            })
            .map(|p| p.id)
            .collect())
    }
}

#[async_trait]
impl AssignmentRepo for MemoryDatabase {
    async fn students_of(&self, coach_id: Uuid) -> AppResult<Vec<Uuid>> {
        let tables = self.tables().await?;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| a.coach_id == coach_id)
            .map(|a| a.student_id)
            .collect())
    }

    async fn assign(&self, assignment: &CoachAssignment) -> AppResult<()> {
        let mut tables = self.tables().await?;
        let exists = tables.assignments.iter().any(|a| {
            a.coach_id == assignment.coach_id && a.student_id == assignment.student_id
        });
        if !exists {
            tables.assignments.push(assignment.clone());
        }
        Ok(())
    }

    async fn unassign(&self, coach_id: Uuid, student_id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        let before = tables.assignments.len();
        tables
            .assignments
            .retain(|a| !(a.coach_id == coach_id && a.student_id == student_id));
        Ok(tables.assignments.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use academy_entity::profile::NewProfile;

    use super::*;

    fn profile(username: &str, role: &str, leader_id: Option<Uuid>) -> Profile {
        NewProfile {
            username: username.into(),
            display_name: None,
            password_hash: "hash".into(),
            role: role.into(),
            leader_id,
            created_by: None,
        }
        .into_profile(Utc::now())
    }

    #[tokio::test]
    async fn test_duplicate_username_is_rejected() {
        let db = MemoryDatabase::new();
        db.create(&profile("amy", "student", None)).await.unwrap();
        let err = db
            .create(&profile("amy", "trader", None))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_role_label_lookup_normalizes_and_skips_inactive() {
        let db = MemoryDatabase::new();
        let root = profile("root", " SuperAdmin ", None);
        let frozen = profile("old-root", "superadmin", None);
        db.create(&root).await.unwrap();
        db.create(&frozen).await.unwrap();
        db.set_status(frozen.id, ProfileStatus::Frozen, Utc::now())
            .await
            .unwrap();

        let ids = db
            .find_active_ids_by_role_labels(&["superadmin".to_string()])
            .await
            .unwrap();
        assert_eq!(ids, vec![root.id]);
    }

    #[tokio::test]
    async fn test_find_children_and_expired_sweep() {
        let db = MemoryDatabase::new();
        let leader = profile("lead", "leader", None);
        let child = profile("kid", "student", Some(leader.id));
        db.create(&leader).await.unwrap();
        db.create(&child).await.unwrap();

        let edges = db.find_children(&[leader.id]).await.unwrap();
        assert_eq!(
            edges,
            vec![TreeEdge {
                id: child.id,
                leader_id: leader.id
            }]
        );

        let now = Utc::now();
        db.set_session(child.id, Uuid::new_v4(), now, now)
            .await
            .unwrap();
        assert_eq!(db.clear_expired_sessions(now).await.unwrap(), 1);
        let child = db.find_by_id(child.id).await.unwrap().unwrap();
        assert!(child.session_id.is_none());
    }
}
