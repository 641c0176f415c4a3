//! Scope resolvers: the subjects an actor may act upon.
//!
//! Three strategies share one contract ([`ScopeResolver`]); [`ScopeHelper`]
//! picks the one matching the actor's canonical role.

pub mod assignment;
pub mod helper;
pub mod provenance;
pub mod tree;

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use academy_core::result::AppResult;

pub use assignment::AssignmentScope;
pub use helper::ScopeHelper;
pub use provenance::ProvenanceScope;
pub use tree::OrgTreeScope;

/// The resolved scope of an actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// No restriction (super_admin).
    Unrestricted,
    /// Exactly these subjects. Empty means no access.
    Subjects(HashSet<Uuid>),
}

impl Scope {
    /// Scope containing only `id`.
    pub fn only(id: Uuid) -> Self {
        Self::Subjects(HashSet::from([id]))
    }

    pub fn contains(&self, id: Uuid) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Subjects(ids) => ids.contains(&id),
        }
    }

    /// `true` only for an empty finite scope.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Subjects(ids) if ids.is_empty())
    }

    /// Keeps the ids that are in scope, preserving order.
    pub fn filter(&self, ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
        ids.into_iter().filter(|id| self.contains(*id)).collect()
    }

    /// `None` when unrestricted, otherwise the sorted subject list.
    pub fn subject_ids(&self) -> Option<Vec<Uuid>> {
        match self {
            Self::Unrestricted => None,
            Self::Subjects(ids) => {
                let mut ids: Vec<_> = ids.iter().copied().collect();
                ids.sort();
                Some(ids)
            }
        }
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.subject_ids().serialize(serializer)
    }
}

/// Computes the subjects a given actor may act upon.
#[async_trait]
pub trait ScopeResolver: Send + Sync + std::fmt::Debug {
    async fn resolve_scope(&self, actor_id: Uuid) -> AppResult<Scope>;
}
