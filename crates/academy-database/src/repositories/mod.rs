//! Repository traits and their PostgreSQL implementations.

pub mod assignment;
pub mod consult;
pub mod course;
pub mod file_access;
pub mod job_lock;
pub mod ladder;
pub mod notification;
pub mod profile;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;

pub use assignment::{AssignmentRepo, PgAssignmentRepository};
pub use consult::{ConsultRepo, PgConsultRepository};
pub use course::{CourseAccessRepo, PgCourseAccessRepository, PgSummaryRepository, SummaryRepo};
pub use file_access::{FileAccessRepo, PgFileAccessRepository};
pub use job_lock::{JobLockRepo, PgJobLockRepository};
pub use ladder::{LadderRepo, PgLadderRepository};
pub use notification::{NotificationRepo, PgNotificationRepository};
pub use profile::{PgProfileRepository, ProfileRepo, TreeEdge};

use crate::connection;
use crate::memory::MemoryDatabase;

/// Reachability of the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreHealth {
    Connected,
    Unavailable,
    /// In-process store; always reachable.
    Memory,
}

/// Every repository behind a trait object, selected once at startup.
#[derive(Debug, Clone)]
pub struct Repositories {
    pool: Option<PgPool>,
    pub profiles: Arc<dyn ProfileRepo>,
    pub assignments: Arc<dyn AssignmentRepo>,
    pub course_access: Arc<dyn CourseAccessRepo>,
    pub summaries: Arc<dyn SummaryRepo>,
    pub ladder: Arc<dyn LadderRepo>,
    pub file_access: Arc<dyn FileAccessRepo>,
    pub notifications: Arc<dyn NotificationRepo>,
    pub consult: Arc<dyn ConsultRepo>,
    pub job_locks: Arc<dyn JobLockRepo>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            pool: Some(pool.clone()),
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
            assignments: Arc::new(PgAssignmentRepository::new(pool.clone())),
            course_access: Arc::new(PgCourseAccessRepository::new(pool.clone())),
            summaries: Arc::new(PgSummaryRepository::new(pool.clone())),
            ladder: Arc::new(PgLadderRepository::new(pool.clone())),
            file_access: Arc::new(PgFileAccessRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            consult: Arc::new(PgConsultRepository::new(pool.clone())),
            job_locks: Arc::new(PgJobLockRepository::new(pool)),
        }
    }

    /// In-memory repositories sharing one [`MemoryDatabase`].
    pub fn memory(db: MemoryDatabase) -> Self {
        Self {
            pool: None,
            profiles: Arc::new(db.clone()),
            assignments: Arc::new(db.clone()),
            course_access: Arc::new(db.clone()),
            summaries: Arc::new(db.clone()),
            ladder: Arc::new(db.clone()),
            file_access: Arc::new(db.clone()),
            notifications: Arc::new(db.clone()),
            consult: Arc::new(db.clone()),
            job_locks: Arc::new(db),
        }
    }

    /// Ping the database, if there is one.
    pub async fn health(&self) -> StoreHealth {
        let Some(pool) = &self.pool else {
            return StoreHealth::Memory;
        };
        match connection::ping(pool).await {
            Ok(()) => StoreHealth::Connected,
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                StoreHealth::Unavailable
            }
        }
    }
}
