//! Server configuration loaded from TOML.
//!
//! Every section is optional; an empty file yields the defaults. Values are
//! fixed once the process has started.

use crate::{Error, Registry, Result};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "intelhealth.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network bind configuration.
    pub server: ServerConfig,
    /// Model cache configuration.
    pub cache: CacheConfig,
    /// Extra or overriding agent → fallback model entries.
    pub registry: BTreeMap<CompactString, CompactString>,
}

/// Network bind configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
        }
    }
}

/// Model cache configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Root directory of exported (merged) model artifacts.
    pub models_dir: PathBuf,
    /// Maximum number of resident models.
    pub max_loaded: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models/merged"),
            max_loaded: 1,
        }
    }
}

impl ServeConfig {
    /// Parse a TOML string, expanding `${ENV_VAR}` references first.
    ///
    /// Fails if a referenced variable is not set.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = crate::utils::expand_env_vars(toml_str)?;
        let config: Self = toml::from_str(&expanded).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Reject values the cache cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_loaded == 0 {
            return Err(Error::Config("cache.max_loaded must be at least 1".into()));
        }
        Ok(())
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The built-in registry with this configuration's overrides applied.
    pub fn registry(&self) -> Registry {
        Registry::default().with_overrides(&self.registry)
    }
}
