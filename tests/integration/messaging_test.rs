//! Integration tests for consult messaging, notifications, and job locks.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use serde_json::json;

use helpers::{CRON_SECRET, TestApp, test_config};

#[tokio::test]
async fn test_consult_thread_between_leader_and_student() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    let boss = app.login("lead").await;
    let me = app.login("stu").await;

    let allowed = app
        .get(&format!("/api/consult/peers/{}/allowed", leader.id), Some(&me))
        .await;
    assert_eq!(allowed.data()["value"], true);

    let sent = app
        .post(
            &format!("/api/consult/peers/{}/messages", leader.id),
            Some(&me),
            json!({ "content": "  Can we review my entries?  " }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::CREATED);
    assert_eq!(sent.data()["content"], "Can we review my entries?");

    let sidebar = app.get("/api/consult/conversations", Some(&boss)).await;
    let rows = sidebar.data().as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["peer_id"], student.id.to_string());
    assert_eq!(rows[0]["unread"], 1);

    let notified = app.get("/api/notifications", Some(&boss)).await;
    assert_eq!(notified.data()[0]["title"], "New message from stu");

    let thread = app
        .get(
            &format!("/api/consult/peers/{}/messages?limit=10", student.id),
            Some(&boss),
        )
        .await;
    assert_eq!(thread.data().as_array().unwrap().len(), 1);

    let read = app
        .post_empty(&format!("/api/consult/peers/{}/read", student.id), Some(&boss))
        .await;
    assert_eq!(read.data()["updated"], 1);
    let sidebar = app.get("/api/consult/conversations", Some(&boss)).await;
    assert_eq!(sidebar.data()[0]["unread"], 0);

    let unread = app
        .post_empty(&format!("/api/consult/peers/{}/unread", student.id), Some(&boss))
        .await;
    assert_eq!(unread.data()["updated"], 1);
    let sidebar = app.get("/api/consult/conversations", Some(&boss)).await;
    assert_eq!(sidebar.data()[0]["unread"], 1);
}

#[tokio::test]
async fn test_consult_outside_scope_is_refused() {
    let app = TestApp::new();
    app.seed("lead", "leader", None).await;
    let stranger = app.seed("far", "student", None).await;
    let boss = app.login("lead").await;

    let allowed = app
        .get(&format!("/api/consult/peers/{}/allowed", stranger.id), Some(&boss))
        .await;
    assert_eq!(allowed.data()["value"], false);

    let sent = app
        .post(
            &format!("/api/consult/peers/{}/messages", stranger.id),
            Some(&boss),
            json!({ "content": "hello" }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    app.seed("stu", "student", Some(leader.id)).await;
    let me = app.login("stu").await;

    let resp = app
        .post(
            &format!("/api/consult/peers/{}/messages", leader.id),
            Some(&me),
            json!({ "content": "   " }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error_code(), "INVALID_BODY");
}

#[tokio::test]
async fn test_recall_window() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    app.seed("stu", "student", Some(leader.id)).await;
    let boss = app.login("lead").await;
    let me = app.login("stu").await;
    let uri = format!("/api/consult/peers/{}/messages", leader.id);

    let first = app.post(&uri, Some(&me), json!({ "content": "one" })).await;
    let first_id = first.data()["id"].as_str().unwrap().to_string();
    let second = app.post(&uri, Some(&me), json!({ "content": "two" })).await;
    let second_id = second.data()["id"].as_str().unwrap().to_string();

    let not_mine = app
        .delete(&format!("/api/consult/messages/{first_id}"), Some(&boss))
        .await;
    assert_eq!(not_mine.status, StatusCode::FORBIDDEN);

    app.clock.advance(Duration::minutes(4));
    let recalled = app
        .delete(&format!("/api/consult/messages/{first_id}"), Some(&me))
        .await;
    assert_eq!(recalled.status, StatusCode::OK);

    app.clock.advance(Duration::minutes(1) + Duration::seconds(1));
    let late = app
        .delete(&format!("/api/consult/messages/{second_id}"), Some(&me))
        .await;
    assert_eq!(late.status, StatusCode::CONFLICT);
    assert_eq!(late.error_code(), "RECALL_EXPIRED");

    let gone = app
        .delete(&format!("/api/consult/messages/{first_id}"), Some(&me))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notifications_fan_out_and_mark_read() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    app.seed("root", "super_admin", None).await;
    app.seed("stu", "student", Some(leader.id)).await;
    let me = app.login("stu").await;
    let boss = app.login("lead").await;
    let admin = app.login("root").await;

    app.post_empty("/api/ladder/request", Some(&me)).await;

    for cookie in [&boss, &admin] {
        let count = app.get("/api/notifications/unread-count", Some(cookie)).await;
        assert_eq!(count.data()["count"], 1);
    }
    let mine = app.get("/api/notifications/unread-count", Some(&me)).await;
    assert_eq!(mine.data()["count"], 0);

    let list = app.get("/api/notifications", Some(&boss)).await;
    let row = list.data()[0].clone();
    assert_eq!(row["title"], "Ladder access request");
    let marked = app
        .post(
            "/api/notifications/read",
            Some(&boss),
            json!({
                "from_user_id": row["from_user_id"],
                "title": row["title"],
                "content": row["content"],
                "created_at": row["created_at"],
            }),
        )
        .await;
    assert_eq!(marked.status, StatusCode::OK);
    assert_eq!(marked.data()["updated"], 1);
    let count = app.get("/api/notifications/unread-count", Some(&boss)).await;
    assert_eq!(count.data()["count"], 0);

    let still = app.get("/api/notifications/unread-count", Some(&admin)).await;
    assert_eq!(still.data()["count"], 1);
    let all = app.post_empty("/api/notifications/read-all", Some(&admin)).await;
    assert_eq!(all.data()["updated"], 1);
}

#[tokio::test]
async fn test_job_lock_endpoints() {
    let app = TestApp::new();
    let acquire = "/api/jobs/nightly_report/acquire";

    let missing = app.job(acquire, None, Some(json!({}))).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    let wrong = app.job(acquire, Some("guess"), Some(json!({}))).await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let first = app
        .job(acquire, Some(CRON_SECRET), Some(json!({ "lease_seconds": 60 })))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["ok"], true);

    let second = app.job(acquire, Some(CRON_SECRET), Some(json!({}))).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.data()["ok"], false);
    assert_eq!(second.data()["error"], "JOB_LOCKED");

    app.clock.advance(Duration::seconds(60));
    let after_lease = app.job(acquire, Some(CRON_SECRET), Some(json!({}))).await;
    assert_eq!(after_lease.data()["ok"], true);

    let released = app
        .job(
            "/api/jobs/nightly_report/release",
            Some(CRON_SECRET),
            Some(json!({ "error": "export timed out" })),
        )
        .await;
    assert_eq!(released.status, StatusCode::OK);

    let status = app
        .job("/api/jobs/nightly_report", Some(CRON_SECRET), None)
        .await;
    assert_eq!(status.status, StatusCode::OK);
    assert!(status.data()["locked_until"].is_null());
    assert_eq!(status.data()["last_error"], "export timed out");

    let unknown = app.job("/api/jobs/never_ran", Some(CRON_SECRET), None).await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_job_endpoints_disabled_without_secret() {
    let mut config = test_config();
    config.worker.cron_secret = String::new();
    let app = TestApp::with_config(config);

    let resp = app
        .job("/api/jobs/nightly_report/acquire", Some(""), Some(json!({})))
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let resp = app.get("/api/health", None).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["status"], "ok");
    assert_eq!(resp.data()["database"], "memory");
}
