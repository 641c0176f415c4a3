//! Integration tests for profile administration and the review workflows.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_course_lifecycle() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    let boss = app.login("lead").await;
    let me = app.login("stu").await;

    let resp = app.post_empty("/api/courses/1/access", Some(&me)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.data()["status"], "requested");

    let pending = app.get("/api/review/courses", Some(&boss)).await;
    assert_eq!(pending.status, StatusCode::OK);
    assert_eq!(pending.data().as_array().unwrap().len(), 1);
    assert_eq!(pending.data()[0]["user_id"], student.id.to_string());

    let early = app
        .put(
            "/api/courses/1/progress",
            Some(&me),
            json!({ "last_video_sec": 10, "progress": 5 }),
        )
        .await;
    assert_eq!(early.status, StatusCode::CONFLICT);
    assert_eq!(early.error_code(), "NOT_APPROVED");

    let reviewed = app
        .post(
            "/api/review/courses",
            Some(&boss),
            json!({ "user_id": student.id, "course_id": 1, "decision": "approve" }),
        )
        .await;
    assert_eq!(reviewed.status, StatusCode::OK);
    assert_eq!(reviewed.data()["status"], "approved");
    assert_eq!(reviewed.data()["reviewed_by"], leader.id.to_string());

    let progress = app
        .put(
            "/api/courses/1/progress",
            Some(&me),
            json!({ "last_video_sec": 120, "progress": 40 }),
        )
        .await;
    assert_eq!(progress.status, StatusCode::OK);
    assert_eq!(progress.data()["progress"], 40);
    assert_eq!(progress.data()["last_video_sec"], 120);

    let done = app.post_empty("/api/courses/1/complete", Some(&me)).await;
    assert_eq!(done.data()["status"], "completed");
    assert_eq!(done.data()["progress"], 100);

    let gated = app.post_empty("/api/courses/2/access", Some(&me)).await;
    assert_eq!(gated.status, StatusCode::CONFLICT);
    assert_eq!(gated.error_code(), "PREV_SUMMARY_REQUIRED");

    let summary = app
        .put(
            "/api/courses/1/summary",
            Some(&me),
            json!({ "content": "Risk first, entries second." }),
        )
        .await;
    assert_eq!(summary.status, StatusCode::OK);

    let next = app.post_empty("/api/courses/2/access", Some(&me)).await;
    assert_eq!(next.status, StatusCode::OK);
    assert_eq!(next.data()["status"], "requested");

    let skipped = app.post_empty("/api/courses/4/access", Some(&me)).await;
    assert_eq!(skipped.error_code(), "PREV_SUMMARY_REQUIRED");

    let unread = app.get("/api/notifications/unread-count", Some(&me)).await;
    assert_eq!(unread.data()["count"], 1);
}

#[tokio::test]
async fn test_course_bounds_and_review_scope() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    app.seed("rival", "leader", None).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    let me = app.login("stu").await;
    let rival = app.login("rival").await;

    for bad in ["0", "13"] {
        let resp = app
            .post_empty(&format!("/api/courses/{bad}/access"), Some(&me))
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.error_code(), "INVALID_COURSE");
    }

    app.post_empty("/api/courses/1/access", Some(&me)).await;

    let queue = app.get("/api/review/courses", Some(&rival)).await;
    assert_eq!(queue.data().as_array().unwrap().len(), 0);

    let resp = app
        .post(
            "/api/review/courses",
            Some(&rival),
            json!({ "user_id": student.id, "course_id": 1, "decision": "approve" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);

    let mine = app.get("/api/courses/1/access", Some(&me)).await;
    assert_eq!(mine.data()["status"], "requested");
}

#[tokio::test]
async fn test_ladder_bulk_review_is_all_or_nothing() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let a = app.seed("a", "student", Some(leader.id)).await;
    let b = app.seed("b", "trader", Some(leader.id)).await;
    let outsider = app.seed("out", "student", None).await;
    let boss = app.login("lead").await;

    for name in ["a", "b"] {
        let cookie = app.login(name).await;
        let resp = app.post_empty("/api/ladder/request", Some(&cookie)).await;
        assert_eq!(resp.data()["status"], "requested");
        assert_eq!(resp.data()["enabled"], false);
    }

    let refused = app
        .post(
            "/api/review/ladder",
            Some(&boss),
            json!({ "user_ids": [a.id, outsider.id], "decision": "approve" }),
        )
        .await;
    assert_eq!(refused.status, StatusCode::FORBIDDEN);
    let pending = app.get("/api/review/ladder", Some(&boss)).await;
    assert_eq!(pending.data().as_array().unwrap().len(), 2);

    let approved = app
        .post(
            "/api/review/ladder",
            Some(&boss),
            json!({ "user_ids": [a.id, b.id], "decision": "approve" }),
        )
        .await;
    assert_eq!(approved.status, StatusCode::OK);
    let rows = approved.data().as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["enabled"] == true));

    let cookie = app.login("a").await;
    let status = app.get("/api/ladder/status", Some(&cookie)).await;
    assert_eq!(status.data()["status"], "approved");
    assert_eq!(status.data()["enabled"], true);
}

#[tokio::test]
async fn test_file_access_grant() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    let boss = app.login("lead").await;
    let me = app.login("stu").await;
    let file_id = Uuid::new_v4();
    let uri = format!("/api/files/{file_id}/access");

    assert_eq!(app.get(&uri, Some(&me)).await.data()["value"], false);

    let requested = app.post_empty(&uri, Some(&me)).await;
    assert_eq!(requested.data()["status"], "requested");

    let rejected = app
        .post(
            "/api/review/files",
            Some(&boss),
            json!({
                "user_id": student.id,
                "file_id": file_id,
                "decision": "reject",
                "reason": "not yet",
            }),
        )
        .await;
    assert_eq!(rejected.data()["status"], "rejected");
    assert_eq!(rejected.data()["rejection_reason"], "not yet");
    assert_eq!(app.get(&uri, Some(&me)).await.data()["value"], false);

    app.post_empty(&uri, Some(&me)).await;
    let approved = app
        .post(
            "/api/review/files",
            Some(&boss),
            json!({ "user_id": student.id, "file_id": file_id, "decision": "approve" }),
        )
        .await;
    assert_eq!(approved.data()["status"], "approved");
    assert!(approved.data()["rejection_reason"].is_null());
    assert_eq!(app.get(&uri, Some(&me)).await.data()["value"], true);
}

#[tokio::test]
async fn test_leader_creates_learners_only() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let boss = app.login("lead").await;

    let created = app
        .post(
            "/api/profiles",
            Some(&boss),
            json!({ "username": "newbie", "password": PASSWORD, "role": "Student" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["role"], "student");
    assert_eq!(created.data()["leader_id"], leader.id.to_string());
    assert_eq!(created.data()["created_by"], leader.id.to_string());

    let coach = app
        .post(
            "/api/profiles",
            Some(&boss),
            json!({ "username": "coachy", "password": PASSWORD, "role": "coach" }),
        )
        .await;
    assert_eq!(coach.status, StatusCode::FORBIDDEN);

    let duplicate = app
        .post(
            "/api/profiles",
            Some(&boss),
            json!({ "username": "newbie", "password": PASSWORD, "role": "trader" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

    let newbie = app.login("newbie").await;
    let me = app.get("/api/auth/me", Some(&newbie)).await;
    assert_eq!(me.data()["user"]["leader_id"], leader.id.to_string());
}

#[tokio::test]
async fn test_coach_assignment_grants_scope() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let coach = app.seed("coach", "coach", Some(leader.id)).await;
    let student = app.seed("stu", "student", Some(leader.id)).await;
    let boss = app.login("lead").await;
    let coach_cookie = app.login("coach").await;

    let before = app
        .get(&format!("/api/profiles/{}", student.id), Some(&coach_cookie))
        .await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);

    let not_a_coach = app
        .post(
            &format!("/api/profiles/{}/coaches", coach.id),
            Some(&boss),
            json!({ "coach_id": student.id }),
        )
        .await;
    assert_eq!(not_a_coach.status, StatusCode::BAD_REQUEST);

    let assigned = app
        .post(
            &format!("/api/profiles/{}/coaches", student.id),
            Some(&boss),
            json!({ "coach_id": coach.id }),
        )
        .await;
    assert_eq!(assigned.status, StatusCode::OK);

    let after = app
        .get(&format!("/api/profiles/{}", student.id), Some(&coach_cookie))
        .await;
    assert_eq!(after.status, StatusCode::OK);
    assert_eq!(after.data()["username"], "stu");

    let removed = app
        .delete(
            &format!("/api/profiles/{}/coaches/{}", student.id, coach.id),
            Some(&boss),
        )
        .await;
    assert_eq!(removed.data()["value"], true);
    let gone = app
        .get(&format!("/api/profiles/{}", student.id), Some(&coach_cookie))
        .await;
    assert_eq!(gone.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_set_status_on_self_is_forbidden() {
    let app = TestApp::new();
    let leader = app.seed("lead", "leader", None).await;
    let boss = app.login("lead").await;

    let resp = app
        .put(
            &format!("/api/profiles/{}/status", leader.id),
            Some(&boss),
            json!({ "status": "frozen" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}
