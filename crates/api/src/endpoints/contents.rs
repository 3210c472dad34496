//! Content endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use lms_common::AppResult;
use lms_core::CreateContentInput;
use lms_db::entities::content;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses/{id}/contents", get(list).post(create))
        .route("/courses/{id}/contents/{content_id}", get(show))
}

/// List the contents of a course the caller is allowed to see.
async fn list(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<content::Model>>> {
    let contents = state
        .content_service
        .list_visible(viewer.as_ref(), id)
        .await?;
    Ok(Json(contents))
}

async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path((id, content_id)): Path<(i32, i32)>,
) -> AppResult<Json<content::Model>> {
    let content = state
        .content_service
        .get_visible(viewer.as_ref(), id, content_id)
        .await?;
    Ok(Json(content))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CreateContentInput>,
) -> AppResult<(StatusCode, Json<content::Model>)> {
    let content = state.content_service.create(&user, id, input).await?;
    Ok((StatusCode::CREATED, Json(content)))
}
