//! Clears expired session fields.

use std::sync::Arc;

use async_trait::async_trait;

use academy_auth::SessionManager;
use academy_core::result::AppResult;

use crate::executor::JobHandler;

pub const SESSION_SWEEP: &str = "session_sweep";

#[derive(Debug)]
pub struct SessionSweepJob {
    sessions: Arc<SessionManager>,
}

impl SessionSweepJob {
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl JobHandler for SessionSweepJob {
    fn job_name(&self) -> &str {
        SESSION_SWEEP
    }

    async fn execute(&self) -> AppResult<u64> {
        self.sessions.sweep_expired().await
    }
}
