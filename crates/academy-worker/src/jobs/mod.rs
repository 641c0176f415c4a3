//! Built-in scheduled jobs.

pub mod notification_cleanup;
pub mod session_sweep;

use std::sync::Arc;

use academy_auth::SessionManager;
use academy_core::config::WorkerConfig;
use academy_core::traits::Clock;
use academy_service::NotificationService;

use crate::executor::JobExecutor;

pub use notification_cleanup::NotificationCleanupJob;
pub use session_sweep::SessionSweepJob;

/// Registers every built-in job on `executor`.
pub fn register_builtin(
    executor: &mut JobExecutor,
    sessions: Arc<SessionManager>,
    notifications: Arc<NotificationService>,
    clock: Arc<dyn Clock>,
    config: &WorkerConfig,
) {
    executor.register(Arc::new(SessionSweepJob::new(sessions)));
    executor.register(Arc::new(NotificationCleanupJob::new(
        notifications,
        clock,
        config.notification_retention_days,
    )));
}
