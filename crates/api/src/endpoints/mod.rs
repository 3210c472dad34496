//! API endpoints.

#![allow(missing_docs)]

mod admin;
mod announcements;
mod auth;
mod bookmarks;
mod comments;
mod completions;
mod contents;
mod courses;
mod feedbacks;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(courses::router())
        .merge(contents::router())
        .merge(comments::router())
        .merge(completions::router())
        .merge(users::router())
        .merge(announcements::router())
        .merge(bookmarks::router())
        .merge(feedbacks::router())
        .merge(admin::router())
}
