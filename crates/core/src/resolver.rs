//! Local-artifact-first model resolution.
//!
//! A fine-tuned export under `<models_dir>/<name>` shadows the registry's
//! base model. Resolution is re-run on every cache miss, so artifacts that
//! land on disk after start-up are picked up without a restart.

use crate::{Error, Registry, Result};
use compact_str::CompactString;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// File extensions recognized as model weights.
pub const WEIGHT_EXTENSIONS: &[&str] = &["safetensors", "bin"];

/// Where a model is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// An exported artifact directory on local disk.
    Local(PathBuf),
    /// A remote (hub) model identifier.
    Remote(CompactString),
}

impl ModelSource {
    /// Whether this source is a local artifact.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(id) => f.write_str(id),
        }
    }
}

/// Resolve `name` to a model source.
///
/// Prefers `models_dir/name` when it is a directory holding at least one
/// weight file, then the registry fallback, otherwise [`Error::NotFound`].
pub fn resolve(name: &str, models_dir: &Path, registry: &Registry) -> Result<ModelSource> {
    let local = models_dir.join(name);
    if has_weights(&local) {
        return Ok(ModelSource::Local(local));
    }

    match registry.lookup_fallback(name) {
        Some(fallback) => {
            tracing::warn!(
                "{name}: no local artifact at {}, falling back to base model {fallback}",
                local.display()
            );
            Ok(ModelSource::Remote(fallback.into()))
        }
        None => Err(Error::NotFound {
            name: name.into(),
            searched: local,
        }),
    }
}

/// Whether `dir` is a directory containing at least one recognized weight file.
pub fn has_weights(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };

    entries.filter_map(|entry| entry.ok()).any(|entry| {
        let path = entry.path();
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| WEIGHT_EXTENSIONS.contains(&ext))
    })
}
