//! API integration tests.
//!
//! Every test drives the full router (authentication middleware included)
//! against a fresh in-memory SQLite database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::{Duration, Utc};
use lms_api::{app, middleware::AppState};
use lms_common::config::{AuthConfig, Config, DatabaseConfig, ServerConfig};
use lms_db::{entities::user, test_utils::TestDatabase};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
        },
    }
}

struct TestApp {
    db: TestDatabase,
    state: AppState,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let db = TestDatabase::new().await.unwrap();
        let state = AppState::new(db.connection(), &create_test_config());
        let router = app(state.clone());
        Self { db, state, router }
    }

    fn token(&self, user: &user::Model) -> String {
        self.state.auth_service.issue_token(user).unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new().await;

    let response = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "email": "ada@example.com",
                "username": "ada",
                "password": "correct horse battery",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = json_body(response).await;
    assert_eq!(user["username"], "ada");
    assert!(user.get("password_hash").is_none());

    let response = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "ada", "password": "correct horse battery"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Login successful");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.send(
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "email": "bob@example.com",
            "username": "bob",
            "password": "long enough password",
        })),
    )
    .await;

    let response = app
        .send(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "bob", "password": "wrong password"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_duplicate_username_is_rejected() {
    let app = TestApp::new().await;
    app.db.create_user("carol", false).await.unwrap();

    let response = app
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "email": "other@example.com",
                "username": "carol",
                "password": "long enough password",
            })),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_course_requires_token() {
    let app = TestApp::new().await;

    let response = app
        .send(
            "POST",
            "/api/courses",
            None,
            Some(json!({"name": "Rust", "price": 0})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/api/bookmarks", Some("garbage"), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.send("GET", "/api/courses", Some("garbage"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_course_makes_caller_the_teacher() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let token = app.token(&teacher);

    let response = app
        .send(
            "POST",
            "/api/courses",
            Some(&token),
            Some(json!({"name": "Rust", "description": "Ownership", "price": 10})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let course = json_body(response).await;
    assert_eq!(course["teacher_id"], teacher.id);

    let response = app
        .send("GET", &format!("/api/courses/{}", course["id"]), None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["name"], "Rust");
}

#[tokio::test]
async fn test_batch_enroll_reports_new_members_only() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let s1 = app.db.create_user("s1", false).await.unwrap();
    let s2 = app.db.create_user("s2", false).await.unwrap();
    let course = app.db.create_course(teacher.id, "Rust", None).await.unwrap();
    let token = app.token(&teacher);
    let uri = format!("/api/courses/{}/batch-enroll", course.id);
    let body = json!({"user_ids": [s1.id, s2.id]});

    let response = app.send("POST", &uri, Some(&token), Some(body.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "2 students enrolled.");

    let response = app.send("POST", &uri, Some(&token), Some(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "0 students enrolled.");

    let response = app
        .send(
            "GET",
            &format!("/api/courses/{}/members", course.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_enroll_by_non_teacher_is_forbidden() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let intruder = app.db.create_user("intruder", false).await.unwrap();
    let course = app.db.create_course(teacher.id, "Rust", None).await.unwrap();

    let response = app
        .send(
            "POST",
            &format!("/api/courses/{}/batch-enroll", course.id),
            Some(&app.token(&intruder)),
            Some(json!({"user_ids": [intruder.id]})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_batch_enroll_into_full_course_fails() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let s1 = app.db.create_user("s1", false).await.unwrap();
    let s2 = app.db.create_user("s2", false).await.unwrap();
    let course = app
        .db
        .create_course(teacher.id, "Tiny", Some(1))
        .await
        .unwrap();
    let token = app.token(&teacher);
    let uri = format!("/api/courses/{}/batch-enroll", course.id);

    app.send("POST", &uri, Some(&token), Some(json!({"user_ids": [s1.id]})))
        .await;
    let response = app
        .send("POST", &uri, Some(&token), Some(json!({"user_ids": [s2.id]})))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn test_completing_content_twice_conflicts() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let student = app.db.create_user("student", false).await.unwrap();
    let course = app.db.create_course(teacher.id, "Rust", None).await.unwrap();
    let content = app
        .db
        .create_content(course.id, "Intro", None, None)
        .await
        .unwrap();
    app.state
        .enrollment_service
        .batch_enroll(&teacher, course.id, &[student.id])
        .await
        .unwrap();
    let token = app.token(&student);
    let uri = format!("/api/contents/{}/complete", content.id);

    let response = app.send("POST", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.send("POST", &uri, Some(&token), None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The only content is done, so the course completion exists.
    let response = app
        .send(
            "GET",
            &format!("/api/courses/{}/certificate_data", course.id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["user_id"], student.id);
}

#[tokio::test]
async fn test_unreleased_content_is_hidden_from_anonymous_callers() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let course = app.db.create_course(teacher.id, "Rust", None).await.unwrap();
    app.db
        .create_content(course.id, "Now", None, None)
        .await
        .unwrap();
    let future = app
        .db
        .create_content(course.id, "Later", Some(Utc::now() + Duration::days(7)), None)
        .await
        .unwrap();
    let list_uri = format!("/api/courses/{}/contents", course.id);

    let response = app.send("GET", &list_uri, None, None).await;
    let contents = json_body(response).await;
    assert_eq!(contents.as_array().unwrap().len(), 1);
    assert_eq!(contents[0]["name"], "Now");

    let detail_uri = format!("/api/courses/{}/contents/{}", course.id, future.id);
    let response = app.send("GET", &detail_uri, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send("GET", &list_uri, Some(&app.token(&teacher)), None)
        .await;
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_comments_appear_only_after_moderation() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let student = app.db.create_user("student", false).await.unwrap();
    let course = app.db.create_course(teacher.id, "Rust", None).await.unwrap();
    let content = app
        .db
        .create_content(course.id, "Intro", None, None)
        .await
        .unwrap();
    app.state
        .enrollment_service
        .batch_enroll(&teacher, course.id, &[student.id])
        .await
        .unwrap();
    let uri = format!("/api/courses/{}/contents/{}/comments", course.id, content.id);

    let response = app
        .send(
            "POST",
            &uri,
            Some(&app.token(&student)),
            Some(json!({"comment": "Great lesson"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let comment = json_body(response).await;
    assert_eq!(comment["is_moderated"], false);

    let response = app.send("GET", &uri, None, None).await;
    assert!(json_body(response).await.as_array().unwrap().is_empty());

    let moderate_uri = format!("/api/comments/{}/moderate", comment["id"]);
    let response = app
        .send(
            "PUT",
            &moderate_uri,
            Some(&app.token(&student)),
            Some(json!({"is_moderated": true})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(
            "PUT",
            &moderate_uri,
            Some(&app.token(&teacher)),
            Some(json!({"is_moderated": true})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.send("GET", &uri, None, None).await;
    let comments = json_body(response).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["comment"], "Great lesson");
}

#[tokio::test]
async fn test_comment_by_non_member_is_forbidden() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let outsider = app.db.create_user("outsider", false).await.unwrap();
    let course = app.db.create_course(teacher.id, "Rust", None).await.unwrap();
    let content = app
        .db
        .create_content(course.id, "Intro", None, None)
        .await
        .unwrap();

    let response = app
        .send(
            "POST",
            &format!("/api/courses/{}/contents/{}/comments", course.id, content.id),
            Some(&app.token(&outsider)),
            Some(json!({"comment": "Hi"})),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dashboard_is_private_to_user_and_staff() {
    let app = TestApp::new().await;
    let alice = app.db.create_user("alice", false).await.unwrap();
    let mallory = app.db.create_user("mallory", false).await.unwrap();
    let staff = app.db.create_user("staff", true).await.unwrap();
    let uri = format!("/api/users/{}/dashboard", alice.id);

    let response = app.send("GET", &uri, Some(&app.token(&alice)), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["username"], "alice");

    let response = app.send("GET", &uri, Some(&app.token(&mallory)), None).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.send("GET", &uri, Some(&app.token(&staff)), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_admin_listing_requires_staff() {
    let app = TestApp::new().await;
    let user = app.db.create_user("plain", false).await.unwrap();
    let staff = app.db.create_user("staff", true).await.unwrap();

    let response = app
        .send("GET", "/api/admin/comments", Some(&app.token(&user)), None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .send(
            "GET",
            "/api/admin/comments?is_moderated=false",
            Some(&app.token(&staff)),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_bookmark_and_feedback_round() {
    let app = TestApp::new().await;
    let teacher = app.db.create_user("teacher", false).await.unwrap();
    let learner = app.db.create_user("learner", false).await.unwrap();
    let course = app.db.create_course(teacher.id, "Rust", None).await.unwrap();
    let content = app
        .db
        .create_content(course.id, "Intro", None, None)
        .await
        .unwrap();
    let token = app.token(&learner);

    let response = app
        .send(
            "POST",
            "/api/bookmarks",
            Some(&token),
            Some(json!({"content_id": content.id})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bookmark = json_body(response).await;
    assert_eq!(bookmark["course"]["id"], course.id);

    let response = app.send("GET", "/api/bookmarks", Some(&token), None).await;
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

    let response = app
        .send(
            "DELETE",
            &format!("/api/bookmarks/{}", bookmark["id"]),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    for rating in [3, 5] {
        let response = app
            .send(
                "POST",
                "/api/feedbacks",
                Some(&token),
                Some(json!({"course_id": course.id, "rating": rating})),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .send("GET", &format!("/api/courses/{}/feedbacks", course.id), None, None)
        .await;
    let feedbacks = json_body(response).await;
    assert_eq!(feedbacks.as_array().unwrap().len(), 1);
    assert_eq!(feedbacks[0]["rating"], 5);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = TestApp::new().await;

    let response = app.send("GET", "/api/nonexistent/endpoint", None, None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
