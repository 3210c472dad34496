//! Authentication endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use lms_common::AppResult;
use lms_core::{LoginInput, RegisterInput};
use lms_db::entities::user;

use crate::{middleware::AppState, response::TokenResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<user::Model>)> {
    let user = state.auth_service.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<TokenResponse>> {
    let (_user, token) = state.auth_service.login(input).await?;

    Ok(Json(TokenResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
