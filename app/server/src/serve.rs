//! Serve entrypoint shared by the binary and the tests.

use crate::{AppState, router};
use anyhow::Result;
use icore::{Engine, Runtime, ServeConfig};
use std::sync::Arc;
use tokio::{sync::oneshot, task::JoinHandle};

/// Handle returned by [`serve`]: the bound port and the shutdown trigger.
pub struct ServeHandle<R: Runtime> {
    /// The port the server is listening on.
    pub port: u16,
    engine: Arc<Engine<R>>,
    shutdown_tx: oneshot::Sender<()>,
    join: JoinHandle<std::io::Result<()>>,
}

impl<R: Runtime> ServeHandle<R> {
    /// The engine behind the server.
    pub fn engine(&self) -> &Arc<Engine<R>> {
        &self.engine
    }

    /// Stop accepting requests, wait for in-flight ones, then release every
    /// loaded model.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(());
        self.join.await??;

        let engine = self.engine;
        tokio::task::spawn_blocking(move || engine.shutdown()).await?;
        tracing::info!("server shut down, models released");
        Ok(())
    }
}

/// Build the engine from `config` and start serving on its bind address.
pub async fn serve<R: Runtime>(runtime: R, config: &ServeConfig) -> Result<ServeHandle<R>> {
    let engine = Engine::new(runtime, config.registry(), &config.cache)?;
    serve_engine(Arc::new(engine), &config.bind_address()).await
}

/// Bind `bind` and serve `engine` in a spawned task.
pub async fn serve_engine<R: Runtime>(
    engine: Arc<Engine<R>>,
    bind: &str,
) -> Result<ServeHandle<R>> {
    let app = router(AppState::new(Arc::clone(&engine)));
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();

    let health = engine.health();
    tracing::info!("listening on {bind} (port {port})");
    tracing::info!(
        "models dir {}, up to {} resident, gpu: {}",
        health.models_dir.display(),
        health.max_loaded,
        health.gpu
    );
    for name in engine.models() {
        if let Some(fallback) = engine.registry().lookup_fallback(&name) {
            tracing::info!("  {name} -> {fallback}");
        }
    }

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        engine,
        shutdown_tx,
        join,
    })
}
