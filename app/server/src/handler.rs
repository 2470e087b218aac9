//! Route handlers.

use crate::{
    ApiError, AppState,
    api::{ChatCompletion, ChatCompletionRequest, HealthResponse, ModelList},
};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use icore::Runtime;
use std::sync::Arc;

/// `GET /v1/models`: the registered names. Never loads a model.
pub async fn models<R: Runtime>(State(state): State<AppState<R>>) -> Json<ModelList> {
    Json(ModelList::new(state.engine.models()))
}

/// `POST /v1/chat/completions`.
///
/// The body is validated before the cache is touched. Load and generation
/// run on the blocking pool.
pub async fn chat_completions<R: Runtime>(
    State(state): State<AppState<R>>,
    payload: Result<Json<ChatCompletionRequest>, JsonRejection>,
) -> Result<Json<ChatCompletion>, ApiError> {
    let Json(request) = payload?;
    let generation = request.generation()?;
    tracing::debug!(
        "chat completion for '{}' ({} messages)",
        generation.model,
        generation.messages.len()
    );

    let engine = Arc::clone(&state.engine);
    let completion = tokio::task::spawn_blocking(move || engine.complete(&generation)).await??;
    Ok(Json(ChatCompletion::new(request.model, completion)))
}

/// `GET /health`.
///
/// Reading the cache waits out an in-flight load, so this also leaves the
/// async workers.
pub async fn health<R: Runtime>(
    State(state): State<AppState<R>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let engine = Arc::clone(&state.engine);
    let health = tokio::task::spawn_blocking(move || engine.health()).await?;
    Ok(Json(health.into()))
}
