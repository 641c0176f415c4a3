//! Named mutex leases backed by the `job_locks` table.

use std::future::Future;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use academy_core::error::AppError;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::repositories::JobLockRepo;
use academy_entity::job::JobLock as JobLockRecord;

/// Acquire/release API over [`JobLockRepo`].
///
/// A lease that is never released expires on its own, so a crashed holder
/// blocks the job for at most one lease.
#[derive(Debug, Clone)]
pub struct JobLock {
    repo: Arc<dyn JobLockRepo>,
    clock: Arc<dyn Clock>,
}

impl JobLock {
    pub fn new(repo: Arc<dyn JobLockRepo>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Takes the lease for `lease` if nobody holds it. Returns whether it was taken.
    pub async fn acquire(&self, job_name: &str, lease: Duration) -> AppResult<bool> {
        if job_name.trim().is_empty() {
            return Err(AppError::invalid_body("Job name must not be empty"));
        }
        if lease <= Duration::zero() {
            return Err(AppError::invalid_body("Lease must be positive"));
        }

        let now = self.clock.now();
        let acquired = self.repo.try_acquire(job_name, now, now + lease).await?;
        if acquired {
            debug!(job_name = %job_name, lease_seconds = lease.num_seconds(), "Job lock acquired");
        } else {
            info!(job_name = %job_name, "Job lock is held elsewhere");
        }
        Ok(acquired)
    }

    /// Clears the lease and records `error` (or clears the last error).
    ///
    /// Releasing is unconditional: any caller may release, held or not.
    pub async fn release(&self, job_name: &str, error: Option<&str>) -> AppResult<()> {
        if !self.repo.release(job_name, error, self.clock.now()).await? {
            warn!(job_name = %job_name, "Released a job lock that was never acquired");
        }
        Ok(())
    }

    pub async fn status(&self, job_name: &str) -> AppResult<Option<JobLockRecord>> {
        self.repo.find(job_name).await
    }

    /// Runs `work` under the lease, releasing afterwards with the error text if it failed.
    ///
    /// Fails with `JOB_LOCKED` without polling `work` when the lease is held.
    pub async fn run_locked<T, F>(&self, job_name: &str, lease: Duration, work: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        if !self.acquire(job_name, lease).await? {
            return Err(AppError::job_locked(format!("Job '{job_name}' is already running")));
        }

        let result = work.await;
        let failure = result.as_ref().err().map(ToString::to_string);
        if let Err(e) = self.release(job_name, failure.as_deref()).await {
            error!(job_name = %job_name, error = %e, "Failed to release job lock");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use academy_core::ManualClock;
    use academy_database::{MemoryDatabase, Repositories};

    use super::*;

    fn lock() -> (JobLock, Arc<ManualClock>, MemoryDatabase) {
        let db = MemoryDatabase::new();
        let clock = Arc::new(ManualClock::starting_now());
        let repos = Repositories::memory(db.clone());
        (JobLock::new(repos.job_locks, clock.clone()), clock, db)
    }

    #[tokio::test]
    async fn test_concurrent_acquire_has_one_winner_until_lease_ends() {
        let (lock, clock, _db) = lock();
        let lease = Duration::seconds(300);

        let (a, b, c) = tokio::join!(
            lock.acquire("cron_news_ingest", lease),
            lock.acquire("cron_news_ingest", lease),
            lock.acquire("cron_news_ingest", lease),
        );
        let winners = [a.unwrap(), b.unwrap(), c.unwrap()]
            .into_iter()
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);

        clock.advance(Duration::seconds(299));
        assert!(!lock.acquire("cron_news_ingest", lease).await.unwrap());

        clock.advance(Duration::seconds(1));
        assert!(lock.acquire("cron_news_ingest", lease).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_frees_the_lease_and_records_error() {
        let (lock, _clock, _db) = lock();
        let lease = Duration::seconds(60);

        assert!(lock.acquire("digest", lease).await.unwrap());
        lock.release("digest", Some("upstream timeout")).await.unwrap();

        let record = lock.status("digest").await.unwrap().unwrap();
        assert_eq!(record.last_error.as_deref(), Some("upstream timeout"));
        assert!(lock.acquire("digest", lease).await.unwrap());
    }

    #[tokio::test]
    async fn test_run_locked_skips_work_while_held() {
        let (lock, _clock, _db) = lock();
        let lease = Duration::seconds(60);
        assert!(lock.acquire("sweep", lease).await.unwrap());

        let ran = AtomicBool::new(false);
        let err = lock
            .run_locked("sweep", lease, async {
                ran.store(true, Ordering::SeqCst);
                Ok(())
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "JOB_LOCKED");
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_run_locked_releases_with_failure_text() {
        let (lock, _clock, _db) = lock();
        let lease = Duration::seconds(60);

        let err = lock
            .run_locked::<(), _>("cleanup", lease, async {
                Err(AppError::internal("disk full"))
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INTERNAL");

        let record = lock.status("cleanup").await.unwrap().unwrap();
        assert_eq!(record.last_error.as_deref(), Some("INTERNAL: disk full"));

        let value = lock.run_locked("cleanup", lease, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
        assert_eq!(lock.status("cleanup").await.unwrap().unwrap().last_error, None);
    }

    #[tokio::test]
    async fn test_invalid_arguments_and_store_failures() {
        let (lock, _clock, db) = lock();

        let err = lock.acquire("", Duration::seconds(1)).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_BODY");
        let err = lock.acquire("x", Duration::zero()).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_BODY");

        db.set_unavailable(true);
        let err = lock.acquire("x", Duration::seconds(1)).await.unwrap_err();
        assert_eq!(err.code(), "DB_ERROR");
    }
}
