//! Job executor: runs registered handlers under their job lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::info;

use academy_core::error::AppError;
use academy_core::result::AppResult;

use crate::lock::JobLock;

const MAX_LEASE_SECONDS: u64 = 7 * 24 * 3600;

/// A named unit of scheduled work.
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// Lock name of this job.
    fn job_name(&self) -> &str;

    /// Runs the job once. Returns the number of rows affected.
    async fn execute(&self) -> AppResult<u64>;
}

/// Dispatches job runs by name, each under its own lease.
#[derive(Debug)]
pub struct JobExecutor {
    handlers: BTreeMap<String, Arc<dyn JobHandler>>,
    lock: JobLock,
    lease: Duration,
}

impl JobExecutor {
    pub fn new(lock: JobLock, lease_seconds: u64) -> Self {
        Self {
            handlers: BTreeMap::new(),
            lock,
            lease: Duration::seconds(lease_seconds.min(MAX_LEASE_SECONDS) as i64),
        }
    }

    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let name = handler.job_name().to_string();
        info!(job_name = %name, "Registered job handler");
        self.handlers.insert(name, handler);
    }

    /// Runs one job. `JOB_LOCKED` when another instance holds its lease.
    pub async fn run(&self, job_name: &str) -> AppResult<u64> {
        let handler = self
            .handlers
            .get(job_name)
            .ok_or_else(|| AppError::not_found(format!("No job named '{job_name}'")))?;

        let affected = self
            .lock
            .run_locked(job_name, self.lease, handler.execute())
            .await?;
        info!(job_name = %job_name, affected, "Job finished");
        Ok(affected)
    }

    pub fn job_names(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    pub fn lock(&self) -> &JobLock {
        &self.lock
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use academy_core::ManualClock;
    use academy_database::{MemoryDatabase, Repositories};

    use super::*;

    #[derive(Debug, Default)]
    struct Counting {
        runs: AtomicU64,
    }

    #[async_trait]
    impl JobHandler for Counting {
        fn job_name(&self) -> &str {
            "counting"
        }

        async fn execute(&self) -> AppResult<u64> {
            Ok(self.runs.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[tokio::test]
    async fn test_run_dispatches_by_name_and_respects_lease() {
        let repos = Repositories::memory(MemoryDatabase::new());
        let lock = JobLock::new(repos.job_locks, Arc::new(ManualClock::starting_now()));
        let handler = Arc::new(Counting::default());

        let mut executor = JobExecutor::new(lock, 300);
        executor.register(handler.clone());
        assert_eq!(executor.job_names(), vec!["counting".to_string()]);

        assert_eq!(executor.run("counting").await.unwrap(), 1);
        assert_eq!(executor.run("counting").await.unwrap(), 2);

        assert!(executor.lock().acquire("counting", Duration::seconds(60)).await.unwrap());
        let err = executor.run("counting").await.unwrap_err();
        assert_eq!(err.code(), "JOB_LOCKED");
        assert_eq!(handler.runs.load(Ordering::SeqCst), 2);

        let err = executor.run("missing").await.unwrap_err();
        assert_eq!(err.code(), "NOT_FOUND");
    }
}
