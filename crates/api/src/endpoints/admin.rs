//! Staff listing endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use lms_common::AppResult;
use lms_core::{AnnouncementFilter, CommentFilter, MemberFilter};
use lms_db::entities::{announcement, comment, membership};

use crate::{extractors::AuthUser, middleware::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/members", get(members))
        .route("/admin/comments", get(comments))
        .route("/admin/announcements", get(announcements))
}

async fn members(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<MemberFilter>,
) -> AppResult<Json<Vec<membership::Model>>> {
    let members = state.admin_service.list_members(&user, filter).await?;
    Ok(Json(members))
}

async fn comments(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<CommentFilter>,
) -> AppResult<Json<Vec<comment::Model>>> {
    let comments = state.admin_service.list_comments(&user, filter).await?;
    Ok(Json(comments))
}

async fn announcements(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<AnnouncementFilter>,
) -> AppResult<Json<Vec<announcement::Model>>> {
    let announcements = state
        .admin_service
        .list_announcements(&user, filter)
        .await?;
    Ok(Json(announcements))
}
