//! Course endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use lms_common::AppResult;
use lms_core::{BatchEnrollInput, CourseAnalytics, CreateCourseInput, EnrollmentLimitInput};
use lms_db::entities::{course, membership};

use crate::{extractors::AuthUser, middleware::AppState, response::MessageResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list).post(create))
        .route("/courses/{id}", get(show))
        .route("/courses/{id}/enrollment-limit", put(set_enrollment_limit))
        .route("/courses/{id}/batch-enroll", post(batch_enroll))
        .route("/courses/{id}/members", get(members))
        .route("/courses/{id}/analytics", get(analytics))
}

async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<course::Model>>> {
    let courses = state.course_service.list().await?;
    Ok(Json(courses))
}

async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<course::Model>> {
    let course = state.course_service.get(id).await?;
    Ok(Json(course))
}

/// Create a course taught by the caller.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCourseInput>,
) -> AppResult<(StatusCode, Json<course::Model>)> {
    let course = state.course_service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

async fn set_enrollment_limit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<EnrollmentLimitInput>,
) -> AppResult<Json<course::Model>> {
    let course = state
        .course_service
        .set_enrollment_limit(&user, id, input)
        .await?;
    Ok(Json(course))
}

/// Enroll a list of users as students.
async fn batch_enroll(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<BatchEnrollInput>,
) -> AppResult<Json<MessageResponse>> {
    let enrolled = state
        .enrollment_service
        .batch_enroll(&user, id, &input.user_ids)
        .await?;

    Ok(Json(MessageResponse::new(format!(
        "{enrolled} students enrolled."
    ))))
}

async fn members(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<membership::Model>>> {
    let members = state.enrollment_service.list_members(&user, id).await?;
    Ok(Json(members))
}

async fn analytics(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CourseAnalytics>> {
    let analytics = state.analytics_service.course_analytics(&user, id).await?;
    Ok(Json(analytics))
}
