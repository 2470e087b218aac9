//! HTTP error mapping.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use icore::Error;
use serde_json::json;

/// An error response: a status code and a `{"detail": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Human-readable message.
    pub detail: String,
}

impl ApiError {
    /// 400 with `detail`.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    /// 500 with `detail`.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                detail: err.to_string(),
            },
            Error::Load { .. } | Error::Generation(_) | Error::Config(_) => {
                tracing::error!("{err:?}");
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        tracing::error!("blocking task failed: {err}");
        Self::internal("internal task failed")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
