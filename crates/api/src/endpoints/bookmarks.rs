//! Bookmark endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use lms_common::AppResult;
use lms_core::{AddBookmarkInput, BookmarkView};

use crate::{extractors::AuthUser, middleware::AppState, response::MessageResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bookmarks", get(list).post(add))
        .route("/bookmarks/{id}", delete(remove))
}

/// Bookmarking the same content twice returns the existing bookmark.
async fn add(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddBookmarkInput>,
) -> AppResult<Json<BookmarkView>> {
    let bookmark = state.bookmark_service.add(&user, input.content_id).await?;
    Ok(Json(bookmark))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookmarkView>>> {
    let bookmarks = state.bookmark_service.list(&user).await?;
    Ok(Json(bookmarks))
}

async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.bookmark_service.delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Bookmark deleted.")))
}
