//! Course feedback endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use lms_common::AppResult;
use lms_core::{SubmitFeedbackInput, UpdateFeedbackInput};
use lms_db::entities::feedback;

use crate::{extractors::AuthUser, middleware::AppState, response::MessageResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feedbacks", post(submit))
        .route("/feedbacks/{id}", put(update).delete(remove))
        .route("/courses/{id}/feedbacks", get(list))
}

/// Submit feedback; a second submission overwrites the first.
async fn submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SubmitFeedbackInput>,
) -> AppResult<Json<feedback::Model>> {
    let feedback = state.feedback_service.submit(&user, input).await?;
    Ok(Json(feedback))
}

async fn list(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<feedback::Model>>> {
    let feedbacks = state.feedback_service.list_for_course(id).await?;
    Ok(Json(feedbacks))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateFeedbackInput>,
) -> AppResult<Json<feedback::Model>> {
    let feedback = state.feedback_service.update(&user, id, input).await?;
    Ok(Json(feedback))
}

async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.feedback_service.delete(&user, id).await?;
    Ok(Json(MessageResponse::new("Feedback deleted.")))
}
