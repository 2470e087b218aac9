//! IntelHealth inference server binary.
//!
//! Resolves configuration from file and flags, picks a device, and serves
//! the HTTP API until ctrl-c, releasing every loaded model on the way out.

use anyhow::Result;
use clap::Parser;
use intelhealth_server::Cli;
use local::CandleRuntime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = cli.resolve()?;

    let placement = local::device(cli.cpu)?;
    tracing::info!("running on {:?} ({:?})", placement.device, placement.dtype);
    let mut runtime = CandleRuntime::new(placement);
    if let Some(seed) = cli.seed {
        runtime = runtime.with_seed(seed);
    }

    let handle = intelhealth_server::serve(runtime, &config).await?;
    tokio::signal::ctrl_c().await?;
    tracing::info!("received ctrl-c, shutting down");
    handle.shutdown().await
}
