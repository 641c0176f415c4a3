//! Shared fixtures for service tests.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use academy_auth::{
    Guard, GuardContext, JwtDecoder, JwtEncoder, PasswordHasher, RoleAliasTable, ScopeHelper,
    SessionManager,
};
use academy_core::ManualClock;
use academy_core::config::AppConfig;
use academy_database::{MemoryDatabase, Repositories};
use academy_entity::profile::{NewProfile, Profile};

use crate::Services;

pub struct Harness {
    pub db: MemoryDatabase,
    pub repos: Repositories,
    pub clock: Arc<ManualClock>,
    pub guard: Guard,
    pub services: Services,
}

impl Harness {
    pub fn new() -> Self {
        let db = MemoryDatabase::new();
        let repos = Repositories::memory(db.clone());
        let clock = Arc::new(ManualClock::starting_now());
        let config = AppConfig::default();
        let roles = Arc::new(RoleAliasTable::builtin());

        let sessions = Arc::new(SessionManager::new(
            JwtEncoder::new(&config.auth),
            JwtDecoder::new(&config.auth, clock.clone()),
            repos.profiles.clone(),
            PasswordHasher::new(),
            clock.clone(),
            config.session.clone(),
        ));
        let guard = Guard::new(
            sessions.clone(),
            roles.clone(),
            Arc::new(ScopeHelper::from_repositories(&repos, &config.scope)),
        );
        let services = Services::new(&repos, sessions, roles, clock.clone(), &config);

        Self {
            db,
            repos,
            clock,
            guard,
            services,
        }
    }

    pub async fn profile(&self, username: &str, role: &str, leader_id: Option<Uuid>) -> Profile {
        self.profile_created_by(username, role, leader_id, None).await
    }

    pub async fn profile_created_by(
        &self,
        username: &str,
        role: &str,
        leader_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) -> Profile {
        let profile = NewProfile {
            username: username.into(),
            display_name: None,
            password_hash: String::new(),
            role: role.into(),
            leader_id,
            created_by,
        }
        .into_profile(Utc::now());
        self.repos.profiles.create(&profile).await.unwrap();
        profile
    }

    pub fn ctx(&self, profile: &Profile) -> GuardContext {
        self.guard.context_for(profile.clone()).unwrap()
    }
}
