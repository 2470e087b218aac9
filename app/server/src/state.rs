//! Shared application state for the HTTP server.

use icore::{Engine, Runtime};
use std::sync::Arc;

/// Shared state available to all request handlers.
pub struct AppState<R: Runtime> {
    /// The inference engine (immutable after init).
    pub engine: Arc<Engine<R>>,
}

impl<R: Runtime> AppState<R> {
    /// Wrap an engine.
    pub fn new(engine: Arc<Engine<R>>) -> Self {
        Self { engine }
    }
}

impl<R: Runtime> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}
