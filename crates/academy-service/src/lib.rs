//! # academy-service
//!
//! Business logic on top of the guard layer. Every public operation takes the
//! [`GuardContext`](academy_auth::GuardContext) produced by a guard and
//! applies scope checks itself.
//!
//! ## Modules
//!
//! - `workflow` — course access, ladder authorization, and file access state machines
//! - `notification` — fan-out, unread counts, grouped read transitions
//! - `consult` — peer messaging with a recall window
//! - `profile` — account creation, status, password reset, coach assignment

pub mod consult;
pub mod notification;
pub mod profile;
pub mod workflow;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use academy_auth::{PasswordHasher, PasswordValidator, RoleAliasTable, SessionManager};
use academy_core::config::AppConfig;
use academy_core::traits::Clock;
use academy_database::Repositories;

pub use consult::ConsultService;
pub use notification::NotificationService;
pub use profile::ProfileService;
pub use workflow::{CourseAccessService, FileAccessService, LadderService};

/// All services, wired over one set of repositories.
#[derive(Debug, Clone)]
pub struct Services {
    pub notifications: Arc<NotificationService>,
    pub consult: Arc<ConsultService>,
    pub courses: Arc<CourseAccessService>,
    pub ladder: Arc<LadderService>,
    pub files: Arc<FileAccessService>,
    pub profiles: Arc<ProfileService>,
}

impl Services {
    pub fn new(
        repos: &Repositories,
        sessions: Arc<SessionManager>,
        roles: Arc<RoleAliasTable>,
        clock: Arc<dyn Clock>,
        config: &AppConfig,
    ) -> Self {
        let notifications = Arc::new(NotificationService::new(
            repos.notifications.clone(),
            repos.profiles.clone(),
            roles.clone(),
            clock.clone(),
        ));

        Self {
            consult: Arc::new(ConsultService::new(
                repos.consult.clone(),
                repos.profiles.clone(),
                roles.clone(),
                notifications.clone(),
                clock.clone(),
            )),
            courses: Arc::new(CourseAccessService::new(
                repos.course_access.clone(),
                repos.summaries.clone(),
                notifications.clone(),
                clock.clone(),
                config.workflow.course_count,
            )),
            ladder: Arc::new(LadderService::new(
                repos.ladder.clone(),
                repos.profiles.clone(),
                notifications.clone(),
                clock.clone(),
            )),
            files: Arc::new(FileAccessService::new(
                repos.file_access.clone(),
                notifications.clone(),
                clock.clone(),
            )),
            profiles: Arc::new(ProfileService::new(
                repos.profiles.clone(),
                repos.assignments.clone(),
                sessions,
                roles,
                PasswordHasher::new(),
                PasswordValidator::new(&config.auth),
                clock,
            )),
            notifications,
        }
    }
}
