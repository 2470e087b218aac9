//! Command-line arguments.

use anyhow::{Context, Result};
use clap::Parser;
use icore::{ServeConfig, config::CONFIG_FILE};
use std::path::{Path, PathBuf};

/// OpenAI-compatible inference server for locally hosted models.
#[derive(Parser, Debug, Default)]
#[command(name = "intelhealth-server", version, about)]
pub struct Cli {
    /// Configuration file. Defaults to `intelhealth.toml` when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Bind host.
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port.
    #[arg(long)]
    pub port: Option<u16>,

    /// Root directory of exported model artifacts.
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Maximum number of models kept in memory.
    #[arg(long)]
    pub max_models: Option<usize>,

    /// Run on the CPU even when a GPU is available.
    #[arg(long)]
    pub cpu: bool,

    /// Fixed sampling seed.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Load the configuration file and apply the flag overrides.
    pub fn resolve(&self) -> Result<ServeConfig> {
        let mut config = match &self.config {
            Some(path) => load(path)?,
            None if Path::new(CONFIG_FILE).is_file() => load(Path::new(CONFIG_FILE))?,
            None => ServeConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.models_dir {
            config.cache.models_dir = dir.clone();
        }
        if let Some(max) = self.max_models {
            config.cache.max_loaded = max;
        }
        config.validate()?;
        Ok(config)
    }
}

fn load(path: &Path) -> Result<ServeConfig> {
    let config = ServeConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    tracing::info!("loaded configuration from {}", path.display());
    Ok(config)
}
