pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

/// Upper bound for multipart CV uploads.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/candidates",
            post(handlers::handle_create_candidate).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/interviews/:id", get(handlers::handle_get_interview))
        .route(
            "/api/v1/interviews/:id/message",
            post(handlers::handle_post_message),
        )
        .with_state(state)
}
