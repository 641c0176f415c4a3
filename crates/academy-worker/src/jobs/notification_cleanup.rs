//! Deletes read notifications past the retention period.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tracing::debug;

use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_service::NotificationService;

use crate::executor::JobHandler;

pub const NOTIFICATION_CLEANUP: &str = "notification_cleanup";

/// Unread notifications are never deleted, however old.
#[derive(Debug)]
pub struct NotificationCleanupJob {
    notifications: Arc<NotificationService>,
    clock: Arc<dyn Clock>,
    retention: Duration,
}

impl NotificationCleanupJob {
    pub fn new(
        notifications: Arc<NotificationService>,
        clock: Arc<dyn Clock>,
        retention_days: i64,
    ) -> Self {
        Self {
            notifications,
            clock,
            retention: Duration::days(retention_days.clamp(0, 36_500)),
        }
    }
}

#[async_trait]
impl JobHandler for NotificationCleanupJob {
    fn job_name(&self) -> &str {
        NOTIFICATION_CLEANUP
    }

    async fn execute(&self) -> AppResult<u64> {
        let cutoff = self.clock.now() - self.retention;
        debug!(cutoff = %cutoff, "Purging read notifications");
        self.notifications.purge_read_before(cutoff).await
    }
}
