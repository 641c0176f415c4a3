//! Provenance scope for assistants.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use academy_core::result::AppResult;
use academy_database::repositories::ProfileRepo;

use super::{Scope, ScopeResolver};

/// Profiles whose `created_by` is the assistant. Not transitive.
#[derive(Debug, Clone)]
pub struct ProvenanceScope {
    profiles: Arc<dyn ProfileRepo>,
}

impl ProvenanceScope {
    pub fn new(profiles: Arc<dyn ProfileRepo>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl ScopeResolver for ProvenanceScope {
    async fn resolve_scope(&self, actor_id: Uuid) -> AppResult<Scope> {
        let created = self.profiles.find_created_by(actor_id).await?;
        Ok(Scope::Subjects(created.into_iter().collect()))
    }
}
