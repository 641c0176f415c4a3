use async_trait::async_trait;
use chrono::{DateTime, Utc};

use academy_core::result::AppResult;
use academy_entity::job::JobLock;

use super::MemoryDatabase;
use crate::repositories::JobLockRepo;

#[async_trait]
impl JobLockRepo for MemoryDatabase {
    async fn try_acquire(
        &self,
        job_name: &str,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        let lock = tables
            .job_locks
            .entry(job_name.to_string())
            .or_insert_with(|| JobLock {
                job_name: job_name.to_string(),
                locked_until: None,
                last_error: None,
                updated_at: now,
            });
        if lock.is_held(now) {
            return Ok(false);
        }
        lock.locked_until = Some(until);
        lock.updated_at = now;
        Ok(true)
    }

    async fn release(
        &self,
        job_name: &str,
        error: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut tables = self.tables().await?;
        Ok(match tables.job_locks.get_mut(job_name) {
            Some(lock) => {
                lock.locked_until = None;
                lock.last_error = error.map(str::to_string);
                lock.updated_at = now;
                true
            }
            None => false,
        })
    }

    async fn find(&self, job_name: &str) -> AppResult<Option<JobLock>> {
        Ok(self.tables().await?.job_locks.get(job_name).cloned())
    }
}
