//! HTTP routes.

use crate::{AppState, handler};
use axum::{
    Router,
    routing::{get, post},
};
use icore::Runtime;
use tower_http::cors::CorsLayer;

/// Build the axum router over `state`.
pub fn router<R: Runtime>(state: AppState<R>) -> Router {
    Router::new()
        .route("/v1/models", get(handler::models::<R>))
        .route("/v1/chat/completions", post(handler::chat_completions::<R>))
        .route("/health", get(handler::health::<R>))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
