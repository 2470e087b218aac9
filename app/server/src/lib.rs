//! IntelHealth inference server: an OpenAI-compatible chat completion API
//! over a bounded cache of locally hosted models.

pub mod api;
pub mod cli;
mod error;
mod handler;
pub mod router;
pub mod serve;
pub mod state;

pub use {
    cli::Cli,
    error::ApiError,
    router::router,
    serve::{ServeHandle, serve, serve_engine},
    state::AppState,
};
