//! In-memory implementation of every repository trait.
//!
//! All tables live behind one async mutex, so each trait method is atomic
//! with respect to every other. That is the same guarantee the PostgreSQL
//! statements give for single-row check-and-set operations such as job leases.

mod jobs;
mod messaging;
mod profiles;
mod workflow;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_entity::consult::ConsultMessage;
use academy_entity::job::JobLock;
use academy_entity::notification::Notification;
use academy_entity::profile::{CoachAssignment, Profile};
use academy_entity::workflow::{
    CourseAccessRequest, FileAccessRequest, FilePermission, LadderAuthorization, ProgressSummary,
};

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    assignments: Vec<CoachAssignment>,
    course_access: HashMap<(Uuid, i32), CourseAccessRequest>,
    summaries: HashMap<(Uuid, i32), ProgressSummary>,
    ladder: HashMap<Uuid, LadderAuthorization>,
    file_access: HashMap<(Uuid, Uuid), FileAccessRequest>,
    file_permissions: HashMap<(Uuid, Uuid), FilePermission>,
    notifications: Vec<Notification>,
    consult: Vec<ConsultMessage>,
    job_locks: HashMap<String, JobLock>,
}

/// Shared in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<Mutex<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryDatabase {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `DB_ERROR` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    async fn tables(&self) -> AppResult<MutexGuard<'_, Tables>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::database("In-memory store is unavailable"));
        }
        Ok(self.tables.lock().await)
    }
}

/// Keeps rows whose user is in `user_ids`, or all rows when it is `None`.
fn in_subjects(user_ids: Option<&[Uuid]>, user_id: &Uuid) -> bool {
    user_ids.is_none_or(|ids| ids.contains(user_id))
}
