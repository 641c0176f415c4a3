//! Application state shared across all handlers.

use std::sync::Arc;

use academy_auth::{
    Guard, JwtDecoder, JwtEncoder, PasswordHasher, RoleAliasTable, ScopeHelper, SessionManager,
};
use academy_core::config::AppConfig;
use academy_core::result::AppResult;
use academy_core::traits::Clock;
use academy_database::Repositories;
use academy_service::Services;
use academy_worker::{JobExecutor, JobLock, jobs};

/// Passed to every handler via `State<AppState>`. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub guard: Arc<Guard>,
    pub services: Services,
    pub job_lock: JobLock,
    pub repos: Repositories,
}

impl AppState {
    /// Wires auth, services, and the job lock over one set of repositories.
    ///
    /// Fails with `CONFIGURATION` when the configured role aliases are invalid.
    pub fn build(config: AppConfig, repos: &Repositories, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let roles = Arc::new(RoleAliasTable::from_config(&config.auth)?);

        let sessions = Arc::new(SessionManager::new(
            JwtEncoder::new(&config.auth),
            JwtDecoder::new(&config.auth, Arc::clone(&clock)),
            Arc::clone(&repos.profiles),
            PasswordHasher::new(),
            Arc::clone(&clock),
            config.session.clone(),
        ));
        let scope = Arc::new(ScopeHelper::from_repositories(repos, &config.scope));
        let guard = Arc::new(Guard::new(Arc::clone(&sessions), Arc::clone(&roles), scope));

        let services = Services::new(repos, sessions, roles, Arc::clone(&clock), &config);
        let job_lock = JobLock::new(Arc::clone(&repos.job_locks), Arc::clone(&clock));

        Ok(Self {
            config: Arc::new(config),
            clock,
            guard,
            services,
            job_lock,
            repos: repos.clone(),
        })
    }

    /// An executor with every built-in job registered.
    pub fn job_executor(&self) -> JobExecutor {
        let mut executor =
            JobExecutor::new(self.job_lock.clone(), self.config.worker.default_lease_seconds);
        jobs::register_builtin(
            &mut executor,
            Arc::clone(self.guard.sessions()),
            Arc::clone(&self.services.notifications),
            Arc::clone(&self.clock),
            &self.config.worker,
        );
        executor
    }
}
