//! Cron scheduler that triggers locked job runs.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, error, info};

use academy_core::config::WorkerConfig;
use academy_core::error::{AppError, ErrorKind};

use crate::executor::JobExecutor;
use crate::jobs::notification_cleanup::NOTIFICATION_CLEANUP;
use crate::jobs::session_sweep::SESSION_SWEEP;

/// Periodic trigger for [`JobExecutor`] runs.
///
/// Every instance schedules every job; the job lock decides which one runs.
pub struct CronScheduler {
    scheduler: JobScheduler,
    executor: Arc<JobExecutor>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("jobs", &self.executor.job_names())
            .finish()
    }
}

impl CronScheduler {
    pub async fn new(executor: Arc<JobExecutor>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self {
            scheduler,
            executor,
        })
    }

    /// Schedules the built-in jobs on their configured cron expressions.
    pub async fn register_default_tasks(&self, config: &WorkerConfig) -> Result<(), AppError> {
        self.register(SESSION_SWEEP, &config.session_sweep_cron).await?;
        self.register(NOTIFICATION_CLEANUP, &config.notification_cleanup_cron)
            .await?;

        info!("All scheduled tasks registered");
        Ok(())
    }

    /// Schedules `job_name` on a six-field cron expression.
    pub async fn register(&self, job_name: &str, cron: &str) -> Result<(), AppError> {
        if !self.executor.job_names().iter().any(|n| n == job_name) {
            return Err(AppError::configuration(format!(
                "Cannot schedule unknown job '{job_name}'"
            )));
        }

        let executor = Arc::clone(&self.executor);
        let name = job_name.to_string();
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let name = name.clone();
            Box::pin(async move {
                debug!(job_name = %name, "Scheduled run triggered");
                match executor.run(&name).await {
                    Ok(_) => {}
                    Err(e) if e.is(ErrorKind::JobLocked) => {
                        debug!(job_name = %name, "Skipped; another instance holds the lock");
                    }
                    Err(e) => error!(job_name = %name, error = %e, "Scheduled job failed"),
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid schedule '{cron}' for {job_name}: {e}"))
        })?;

        self.scheduler.add(job).await.map_err(|e| {
            AppError::internal(format!("Failed to add {job_name} schedule: {e}"))
        })?;

        info!(job_name = %job_name, cron = %cron, "Registered scheduled job");
        Ok(())
    }

    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        info!("Cron scheduler started");
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        let mut scheduler = self.scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        info!("Cron scheduler shut down");
        Ok(())
    }
}
