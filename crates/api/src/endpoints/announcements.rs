//! Announcement endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use lms_common::AppResult;
use lms_core::{CreateAnnouncementInput, UpdateAnnouncementInput};
use lms_db::entities::announcement;

use crate::{extractors::AuthUser, middleware::AppState, response::MessageResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses/{id}/announcements", get(list).post(create))
        .route("/announcements/{id}", put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<announcement::Model>>> {
    let announcements = state.announcement_service.list_for_course(id).await?;
    Ok(Json(announcements))
}

async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<CreateAnnouncementInput>,
) -> AppResult<(StatusCode, Json<announcement::Model>)> {
    let announcement = state
        .announcement_service
        .create(&user, id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateAnnouncementInput>,
) -> AppResult<Json<announcement::Model>> {
    let announcement = state
        .announcement_service
        .update(&user, id, input)
        .await?;
    Ok(Json(announcement))
}

async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.announcement_service.delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Announcement deleted.")))
}
