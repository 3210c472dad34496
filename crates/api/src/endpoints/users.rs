//! Per-user endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use lms_common::AppResult;
use lms_core::UserDashboard;
use lms_db::entities::course_completion;

use crate::{extractors::AuthUser, middleware::AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}/dashboard", get(dashboard))
        .route("/users/{id}/completed_courses_list", get(completed_courses))
}

async fn dashboard(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<UserDashboard>> {
    let dashboard = state.analytics_service.user_dashboard(&user, id).await?;
    Ok(Json(dashboard))
}

async fn completed_courses(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<course_completion::Model>>> {
    let completions = state
        .completion_service
        .list_user_completed_courses(&user, id)
        .await?;
    Ok(Json(completions))
}
