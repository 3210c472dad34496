//! HTTP API layer for lms-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: courses, contents, comments, enrollment, completions,
//!   announcements, bookmarks, feedback and staff listings
//! - **Extractors**: authenticated and optional user
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;

use axum::{Router, middleware as axum_middleware};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{AppState, auth_middleware};

/// Build the complete application: the API under `/api`, token
/// authentication, request tracing and CORS.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
