//! Completion and certificate endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use lms_common::AppResult;
use lms_core::Certificate;
use lms_db::entities::{content_completion, course_completion};

use crate::{extractors::AuthUser, middleware::AppState, response::MessageResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contents/{id}/complete", post(complete))
        .route("/content-completions/{id}", delete(remove))
        .route("/courses/{id}/my-completions", get(my_completions))
        .route("/courses/{id}/certificate_data", get(certificate_data))
        .route("/courses/{id}/completions", get(course_completions))
        .route("/certificates/{id}", get(certificate))
}

/// Mark a content item completed for the caller.
///
/// Completing the last item of a course also records the course completion.
async fn complete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<content_completion::Model>)> {
    let completion = state.completion_service.complete_content(&user, id).await?;
    Ok((StatusCode::CREATED, Json(completion)))
}

async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state
        .completion_service
        .delete_content_completion(&user, id)
        .await?;
    Ok(Json(MessageResponse::new("Content completion deleted.")))
}

async fn my_completions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<content_completion::Model>>> {
    let completions = state
        .completion_service
        .list_my_content_completions(&user, id)
        .await?;
    Ok(Json(completions))
}

async fn certificate_data(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<course_completion::Model>> {
    let completion = state.completion_service.certificate_data(&user, id).await?;
    Ok(Json(completion))
}

async fn course_completions(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<course_completion::Model>>> {
    let completions = state
        .completion_service
        .list_course_completions(&user, id)
        .await?;
    Ok(Json(completions))
}

async fn certificate(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Certificate>> {
    let certificate = state.completion_service.certificate(&user, id).await?;
    Ok(Json(certificate))
}
