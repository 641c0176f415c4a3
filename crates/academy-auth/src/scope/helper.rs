//! Strategy selection by canonical role.

use std::sync::Arc;

use uuid::Uuid;

use academy_core::config::ScopeConfig;
use academy_core::result::AppResult;
use academy_database::Repositories;
use academy_entity::profile::CanonicalRole;

use super::{AssignmentScope, OrgTreeScope, ProvenanceScope, Scope, ScopeResolver};

/// Resolves the scope of any actor by picking the strategy for its role.
#[derive(Debug, Clone)]
pub struct ScopeHelper {
    tree: Arc<dyn ScopeResolver>,
    assignment: Arc<dyn ScopeResolver>,
    provenance: Arc<dyn ScopeResolver>,
}

impl ScopeHelper {
    pub fn new(
        tree: Arc<dyn ScopeResolver>,
        assignment: Arc<dyn ScopeResolver>,
        provenance: Arc<dyn ScopeResolver>,
    ) -> Self {
        Self {
            tree,
            assignment,
            provenance,
        }
    }

    /// The three built-in strategies over `repos`.
    pub fn from_repositories(repos: &Repositories, config: &ScopeConfig) -> Self {
        Self::new(
            Arc::new(OrgTreeScope::new(repos.profiles.clone(), config.max_tree_depth)),
            Arc::new(AssignmentScope::new(repos.assignments.clone())),
            Arc::new(ProvenanceScope::new(repos.profiles.clone())),
        )
    }

    /// Scope of `actor_id` acting as `role`.
    ///
    /// | role | scope |
    /// |---|---|
    /// | super_admin | unrestricted |
    /// | leader | org-tree descendants and self |
    /// | coach | assigned students |
    /// | assistant | profiles it created |
    /// | student, trader | self |
    pub async fn scope_for(&self, actor_id: Uuid, role: CanonicalRole) -> AppResult<Scope> {
        match role {
            CanonicalRole::SuperAdmin => Ok(Scope::Unrestricted),
            CanonicalRole::Leader => self.tree.resolve_scope(actor_id).await,
            CanonicalRole::Coach => self.assignment.resolve_scope(actor_id).await,
            CanonicalRole::Assistant => self.provenance.resolve_scope(actor_id).await,
            CanonicalRole::Student | CanonicalRole::Trader => Ok(Scope::only(actor_id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use academy_database::MemoryDatabase;
    use academy_entity::profile::{CoachAssignment, NewProfile};

    use super::*;

    #[tokio::test]
    async fn test_strategy_per_role() {
        let db = MemoryDatabase::new();
        let repos = Repositories::memory(db.clone());
        let helper = ScopeHelper::from_repositories(&repos, &ScopeConfig::default());

        let staff = Uuid::new_v4();
        let created = NewProfile {
            username: "made".into(),
            display_name: None,
            password_hash: String::new(),
            role: "student".into(),
            leader_id: None,
            created_by: Some(staff),
        }
        .into_profile(Utc::now());
        repos.profiles.create(&created).await.unwrap();

        let assigned = Uuid::new_v4();
        repos
            .assignments
            .assign(&CoachAssignment {
                coach_id: staff,
                student_id: assigned,
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let coach = helper.scope_for(staff, CanonicalRole::Coach).await.unwrap();
        assert_eq!(coach, Scope::only(assigned));

        let assistant = helper
            .scope_for(staff, CanonicalRole::Assistant)
            .await
            .unwrap();
        assert_eq!(assistant, Scope::only(created.id));

        let student = helper.scope_for(staff, CanonicalRole::Student).await.unwrap();
        assert_eq!(student, Scope::only(staff));

        let admin = helper
            .scope_for(staff, CanonicalRole::SuperAdmin)
            .await
            .unwrap();
        assert_eq!(admin, Scope::Unrestricted);
    }
}
