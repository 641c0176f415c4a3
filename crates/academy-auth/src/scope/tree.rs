//! Organizational-tree scope for leaders.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;
use uuid::Uuid;

use academy_core::result::AppResult;
use academy_database::repositories::ProfileRepo;

use super::{Scope, ScopeResolver};

/// Everyone below the actor in the `leader_id` tree, plus the actor.
///
/// Breadth-first over parent pointers, one query per level. A profile seen
/// twice means the tree contains a cycle; the edge is logged and skipped.
/// Descent stops after `max_depth` levels.
#[derive(Debug, Clone)]
pub struct OrgTreeScope {
    profiles: Arc<dyn ProfileRepo>,
    max_depth: usize,
}

impl OrgTreeScope {
    pub fn new(profiles: Arc<dyn ProfileRepo>, max_depth: usize) -> Self {
        Self {
            profiles,
            max_depth,
        }
    }
}

#[async_trait]
impl ScopeResolver for OrgTreeScope {
    async fn resolve_scope(&self, actor_id: Uuid) -> AppResult<Scope> {
        let mut visited = HashSet::from([actor_id]);
        let mut frontier = vec![actor_id];
        let mut depth = 0;

        while !frontier.is_empty() {
            if depth == self.max_depth {
                error!(
                    actor_id = %actor_id,
                    max_depth = self.max_depth,
                    "Organization tree exceeds depth bound; scope truncated"
                );
                break;
            }

            let mut next = Vec::new();
            for edge in self.profiles.find_children(&frontier).await? {
                if visited.insert(edge.id) {
                    next.push(edge.id);
                } else {
                    error!(
                        actor_id = %actor_id,
                        profile_id = %edge.id,
                        leader_id = %edge.leader_id,
                        "Cycle in organization tree"
                    );
                }
            }

            frontier = next;
            depth += 1;
        }

        Ok(Scope::Subjects(visited))
    }
}
