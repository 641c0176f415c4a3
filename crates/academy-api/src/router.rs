//! Route definitions for the Academy HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use axum::Router;
use axum::routing::{delete, get, post, put};

use crate::handlers;
use crate::state::AppState;

/// Build the router with all routes, threading `AppState` through every handler.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(course_routes())
        .merge(ladder_routes())
        .merge(file_routes())
        .merge(review_routes())
        .merge(notification_routes())
        .merge(consult_routes())
        .merge(job_routes())
        .route("/scope", get(handlers::scope::my_scope))
        .route("/health", get(handlers::health::health));

    Router::new().nest("/api", api_routes).with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profiles", post(handlers::profile::create_profile))
        .route("/profiles/{id}", get(handlers::profile::get_profile))
        .route("/profiles/{id}/status", put(handlers::profile::set_status))
        .route("/profiles/{id}/password", put(handlers::profile::reset_password))
        .route("/profiles/{id}/coaches", post(handlers::profile::assign_coach))
        .route(
            "/profiles/{id}/coaches/{coach_id}",
            delete(handlers::profile::unassign_coach),
        )
}

fn course_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{id}/access",
            get(handlers::course::get_access).post(handlers::course::request_access),
        )
        .route("/courses/{id}/progress", put(handlers::course::update_progress))
        .route("/courses/{id}/complete", post(handlers::course::complete))
        .route("/courses/{id}/summary", put(handlers::course::submit_summary))
}

fn ladder_routes() -> Router<AppState> {
    Router::new()
        .route("/ladder/request", post(handlers::ladder::request))
        .route("/ladder/status", get(handlers::ladder::status))
}

fn file_routes() -> Router<AppState> {
    Router::new().route(
        "/files/{id}/access",
        get(handlers::file_access::has_access).post(handlers::file_access::request_access),
    )
}

/// Manager review queues.
fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/review/courses",
            get(handlers::course::list_pending).post(handlers::course::review),
        )
        .route(
            "/review/ladder",
            get(handlers::ladder::list_pending).post(handlers::ladder::review),
        )
        .route(
            "/review/files",
            get(handlers::file_access::list_pending).post(handlers::file_access::review),
        )
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route("/notifications/read", post(handlers::notification::mark_read))
        .route(
            "/notifications/read-all",
            post(handlers::notification::mark_all_read),
        )
}

fn consult_routes() -> Router<AppState> {
    Router::new()
        .route("/consult/conversations", get(handlers::consult::conversations))
        .route(
            "/consult/peers/{peer_id}/allowed",
            get(handlers::consult::can_consult),
        )
        .route(
            "/consult/peers/{peer_id}/messages",
            get(handlers::consult::thread).post(handlers::consult::send),
        )
        .route("/consult/peers/{peer_id}/read", post(handlers::consult::mark_read))
        .route(
            "/consult/peers/{peer_id}/unread",
            post(handlers::consult::mark_unread),
        )
        .route("/consult/messages/{id}", delete(handlers::consult::recall))
}

/// Shared-secret entry points for external schedulers.
fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs/{name}", get(handlers::jobs::status))
        .route("/jobs/{name}/acquire", post(handlers::jobs::acquire))
        .route("/jobs/{name}/release", post(handlers::jobs::release))
}
