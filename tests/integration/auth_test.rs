//! Integration tests for login, the single-session rule, and guards.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use helpers::{PASSWORD, TestApp, cookie_token, session_cookie};

#[tokio::test]
async fn test_login_sets_cookie_and_me_resolves() {
    let app = TestApp::new();
    let student = app.seed("alice", "student", None).await;

    let resp = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "alice", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["role"], "student");
    assert!(resp.data()["user"].get("password_hash").is_none());

    let cookie = session_cookie(&resp.headers).unwrap();
    assert!(cookie.starts_with(&format!("{}=", app.config.session.cookie_name)));

    let me = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["user"]["id"], student.id.to_string());
    assert_eq!(me.data()["role"], "student");
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = TestApp::new();
    app.seed("alice", "student", None).await;

    let wrong_password = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "alice", "password": "not-the-password" }),
        )
        .await;
    let unknown_user = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "nobody", "password": PASSWORD }),
        )
        .await;

    for resp in [wrong_password, unknown_user] {
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.error_code(), "UNAUTHORIZED");
        assert_eq!(resp.body["message"], "Invalid username or password");
    }
}

#[tokio::test]
async fn test_missing_session_is_unauthorized() {
    let app = TestApp::new();
    let resp = app.get("/api/auth/me", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error_code(), "UNAUTHORIZED");
}

#[tokio::test]
async fn test_second_login_supersedes_first() {
    let app = TestApp::new();
    app.seed("alice", "trader", None).await;

    let first = app.login("alice").await;
    let second = app.login("alice").await;

    let stale = app.get("/api/auth/me", Some(&first)).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let live = app.get("/api/auth/me", Some(&second)).await;
    assert_eq!(live.status, StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let app = TestApp::new();
    app.seed("alice", "student", None).await;
    let cookie = app.login("alice").await;

    let resp = app.get_bearer("/api/auth/me", cookie_token(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);

    let garbage = app.get_bearer("/api/auth/me", "not.a.jwt").await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_expires_with_ttl() {
    let app = TestApp::new();
    app.seed("alice", "student", None).await;
    let cookie = app.login("alice").await;

    let ttl = app.config.session.ttl_hours as i64;
    app.clock.advance(Duration::hours(ttl) - Duration::minutes(1));
    assert_eq!(app.get("/api/auth/me", Some(&cookie)).await.status, StatusCode::OK);

    app.clock.advance(Duration::minutes(1));
    let expired = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(expired.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_kills_session_and_clears_cookie() {
    let app = TestApp::new();
    app.seed("alice", "student", None).await;
    let cookie = app.login("alice").await;

    let resp = app.post_empty("/api/auth/logout", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let cleared = session_cookie(&resp.headers).unwrap();
    assert_eq!(cookie_token(&cleared), "");

    let after = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let again = app.post_empty("/api/auth/logout", None).await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_frozen_account_is_refused() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    let boss = app.login("lead").await;
    let learner = app.login("stu").await;

    let resp = app
        .put(
            &format!("/api/profiles/{}/status", student.id),
            Some(&boss),
            json!({ "status": "frozen" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["status"], "frozen");

    let revoked = app.get("/api/auth/me", Some(&learner)).await;
    assert_eq!(revoked.status, StatusCode::UNAUTHORIZED);

    let login = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "stu", "password": PASSWORD }),
        )
        .await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
    assert_eq!(login.error_code(), "FROZEN");
}

#[tokio::test]
async fn test_role_guards() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    let learner = app.login("stu").await;
    let boss = app.login("lead").await;

    let review = app.get("/api/review/courses", Some(&learner)).await;
    assert_eq!(review.status, StatusCode::FORBIDDEN);
    assert_eq!(review.error_code(), "FORBIDDEN");

    let ladder = app.post_empty("/api/ladder/request", Some(&boss)).await;
    assert_eq!(ladder.status, StatusCode::FORBIDDEN);

    let reset = app
        .put(
            &format!("/api/profiles/{}/password", student.id),
            Some(&boss),
            json!({ "password": "Quiet-Harbor-Lantern-5518" }),
        )
        .await;
    assert_eq!(reset.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unrecognized_role_fails_closed() {
    let app = TestApp::new();
    app.seed("ghost", "janitor", None).await;
    let cookie = app.login("ghost").await;

    let resp = app.get("/api/auth/me", Some(&cookie)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_password_reset_revokes_session() {
    let app = TestApp::new();
    app.seed("root", "super_admin", None).await;
    let student = app.seed("stu", "student", None).await;
    let admin = app.login("root").await;
    let learner = app.login("stu").await;

    let weak = app
        .put(
            &format!("/api/profiles/{}/password", student.id),
            Some(&admin),
            json!({ "password": "password" }),
        )
        .await;
    assert_eq!(weak.status, StatusCode::BAD_REQUEST);
    assert_eq!(weak.error_code(), "WEAK_PASSWORD");

    let new_password = "Quiet-Harbor-Lantern-5518";
    let resp = app
        .put(
            &format!("/api/profiles/{}/password", student.id),
            Some(&admin),
            json!({ "password": new_password }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let stale = app.get("/api/auth/me", Some(&learner)).await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);

    let login = app
        .post(
            "/api/auth/login",
            None,
            json!({ "username": "stu", "password": new_password }),
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
}

#[tokio::test]
async fn test_scope_endpoint() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    app.seed("other", "student", None).await;
    app.seed("root", "super_admin", None).await;

    let boss = app.login("lead").await;
    let resp = app.get("/api/scope", Some(&boss)).await;
    assert_eq!(resp.status, StatusCode::OK);
    let ids: Vec<&str> = resp
        .data()
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(ids.contains(&student.id.to_string().as_str()));
    assert_eq!(ids.len(), 2);

    let admin = app.login("root").await;
    let resp = app.get("/api/scope", Some(&admin)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.data().is_null());
}
