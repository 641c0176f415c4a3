//! Shared test helpers for integration tests.
//!
//! Every test gets its own in-memory store and a manually driven clock, so
//! no database or wall-clock waits are needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use academy_api::{AppState, build_app};
use academy_auth::PasswordHasher;
use academy_core::{Clock, ManualClock};
use academy_core::config::AppConfig;
use academy_database::{MemoryDatabase, Repositories};
use academy_entity::profile::{NewProfile, Profile};

/// Password given to every seeded profile.
pub const PASSWORD: &str = "Blue-Falcon-Ledger-2931";

/// Shared secret for the job endpoints.
pub const CRON_SECRET: &str = "integration-cron-secret";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Direct repository access for seeding and assertions
    pub repos: Repositories,
    /// Time source shared with every service
    pub clock: Arc<ManualClock>,
    /// Application config
    pub config: AppConfig,
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The machine-readable code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.session.cookie_secure = false;
    config.worker.enabled = false;
    config.worker.cron_secret = CRON_SECRET.to_string();
    config
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let repos = Repositories::memory(MemoryDatabase::new());
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::build(config.clone(), &repos, clock.clone())
            .expect("Failed to build app state");

        Self {
            router: build_app(state),
            repos,
            clock,
            config,
        }
    }

    /// Insert a profile directly, with [`PASSWORD`] as its password.
    pub async fn seed(&self, username: &str, role: &str, leader_id: Option<Uuid>) -> Profile {
        let password_hash = PasswordHasher::new()
            .hash_password(PASSWORD)
            .expect("Failed to hash password");
        let profile = NewProfile {
            username: username.to_string(),
            display_name: None,
            password_hash,
            role: role.to_string(),
            leader_id,
            created_by: None,
        }
        .into_profile(self.clock.now());
        self.repos
            .profiles
            .create(&profile)
            .await
            .expect("Failed to seed profile");
        profile
    }

    /// Log in and return the `name=value` pair of the session cookie.
    pub async fn login(&self, username: &str) -> String {
        let resp = self
            .post(
                "/api/auth/login",
                None,
                serde_json::json!({ "username": username, "password": PASSWORD }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "login failed: {:?}", resp.body);
        session_cookie(&resp.headers).expect("login did not set a cookie")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.call(builder.body(body).expect("Failed to build request"))
            .await
    }

    /// Send a prepared request through the router.
    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, cookie, Some(body)).await
    }

    /// POST without a body.
    pub async fn post_empty(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::POST, uri, cookie, None).await
    }

    pub async fn put(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, cookie, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, cookie, None).await
    }

    /// GET with a bearer token instead of a cookie.
    pub async fn get_bearer(&self, uri: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("Failed to build request");
        self.call(request).await
    }

    /// A job endpoint call carrying `secret` in `x-cron-secret`.
    pub async fn job(&self, uri: &str, secret: Option<&str>, body: Option<Value>) -> TestResponse {
        let method = if body.is_some() { Method::POST } else { Method::GET };
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(secret) = secret {
            builder = builder.header("x-cron-secret", secret);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.call(builder.body(body).expect("Failed to build request"))
            .await
    }
}

/// The `name=value` pair from a `Set-Cookie` header.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(SET_COOKIE)?.to_str().ok()?;
    raw.split(';').next().map(|pair| pair.trim().to_string())
}

/// The token carried by a `name=value` cookie pair.
pub fn cookie_token(cookie: &str) -> &str {
    cookie.split_once('=').map(|(_, v)| v).unwrap_or_default()
}
