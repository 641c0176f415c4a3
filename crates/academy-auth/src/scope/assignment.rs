//! Assignment scope for coaches.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use academy_core::result::AppResult;
use academy_database::repositories::AssignmentRepo;

use super::{Scope, ScopeResolver};

/// Students explicitly assigned to the coach. Not transitive.
#[derive(Debug, Clone)]
pub struct AssignmentScope {
    assignments: Arc<dyn AssignmentRepo>,
}

impl AssignmentScope {
    pub fn new(assignments: Arc<dyn AssignmentRepo>) -> Self {
        Self { assignments }
    }
}

#[async_trait]
impl ScopeResolver for AssignmentScope {
    async fn resolve_scope(&self, actor_id: Uuid) -> AppResult<Scope> {
        let students = self.assignments.students_of(actor_id).await?;
        Ok(Scope::Subjects(students.into_iter().collect()))
    }
}
