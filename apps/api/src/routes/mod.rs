pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/match-text", post(handlers::handle_match_text))
        .route("/match-image", post(handlers::handle_match_image))
        .route(
            "/match-text-multiple",
            post(handlers::handle_match_text_multiple),
        )
        .route(
            "/match-image-multiple",
            post(handlers::handle_match_image_multiple),
        )
        .layer(body_limit)
        .with_state(state)
}
