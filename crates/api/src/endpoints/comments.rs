//! Comment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use lms_common::AppResult;
use lms_core::{CreateCommentInput, ModerateCommentInput};
use lms_db::entities::comment;

use crate::{extractors::AuthUser, middleware::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/courses/{id}/contents/{content_id}/comments",
            get(list).post(create),
        )
        .route("/comments/{id}/moderate", put(moderate))
}

/// Approved comments only.
async fn list(
    State(state): State<AppState>,
    Path((id, content_id)): Path<(i32, i32)>,
) -> AppResult<Json<Vec<comment::Model>>> {
    let comments = state.comment_service.list_moderated(id, content_id).await?;
    Ok(Json(comments))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path((id, content_id)): Path<(i32, i32)>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<(StatusCode, Json<comment::Model>)> {
    let comment = state
        .comment_service
        .create(&user, id, content_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

async fn moderate(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<ModerateCommentInput>,
) -> AppResult<Json<comment::Model>> {
    let comment = state.comment_service.moderate(&user, id, input).await?;
    Ok(Json(comment))
}
