//! Checkpoint discovery, local or from the HuggingFace hub.

use anyhow::{Context, Result, bail};
use hf_hub::api::sync::Api;
use icore::ModelSource;
use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

/// Model configuration file name.
pub const CONFIG: &str = "config.json";

/// Tokenizer file name.
pub const TOKENIZER: &str = "tokenizer.json";

/// Sharded safetensors index file name.
const SAFETENSORS_INDEX: &str = "model.safetensors.index.json";

/// Single-file safetensors checkpoint name.
const SAFETENSORS: &str = "model.safetensors";

/// Weight file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightFormat {
    /// One or more `*.safetensors` shards (memory mapped).
    Safetensors,
    /// A pytorch `*.bin` checkpoint.
    Pytorch,
}

/// Files making up one checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `config.json`
    pub config: PathBuf,
    /// `tokenizer.json`
    pub tokenizer: PathBuf,
    /// Weight files, sorted.
    pub weights: Vec<PathBuf>,
    /// Format of `weights`.
    pub format: WeightFormat,
}

impl Artifacts {
    /// Locate the artifacts of a resolved source.
    pub fn fetch(source: &ModelSource) -> Result<Self> {
        match source {
            ModelSource::Local(dir) => Self::discover(dir),
            ModelSource::Remote(id) => Self::download(id),
        }
    }

    /// Discover a checkpoint in an exported model directory.
    ///
    /// Safetensors shards win over pytorch `.bin` files when both exist.
    pub fn discover(dir: &Path) -> Result<Self> {
        let config = dir.join(CONFIG);
        let tokenizer = dir.join(TOKENIZER);
        if !config.is_file() {
            bail!("missing {CONFIG} in {}", dir.display());
        }
        if !tokenizer.is_file() {
            bail!("missing {TOKENIZER} in {}", dir.display());
        }

        let files = weight_files(dir)?;
        let safetensors: Vec<_> = files
            .iter()
            .filter(|path| has_extension(path, "safetensors"))
            .cloned()
            .collect();
        let (weights, format) = if !safetensors.is_empty() {
            (safetensors, WeightFormat::Safetensors)
        } else {
            let pytorch: Vec<_> = files
                .into_iter()
                .filter(|path| has_extension(path, "bin"))
                .take(1)
                .collect();
            if pytorch.is_empty() {
                bail!("no weight files in {}", dir.display());
            }
            (pytorch, WeightFormat::Pytorch)
        };

        Ok(Self {
            config,
            tokenizer,
            weights,
            format,
        })
    }

    /// Fetch a checkpoint from the hub cache, downloading it if needed.
    pub fn download(id: &str) -> Result<Self> {
        tracing::info!("fetching {id} from the HuggingFace hub");
        let repo = Api::new()?.model(id.to_owned());
        let config = repo.get(CONFIG)?;
        let tokenizer = repo.get(TOKENIZER)?;

        let weights = match repo.get(SAFETENSORS_INDEX) {
            Ok(index) => shards(&index)?
                .into_iter()
                .map(|shard| repo.get(&shard))
                .collect::<Result<Vec<_>, _>>()?,
            Err(_) => vec![repo.get(SAFETENSORS)?],
        };

        Ok(Self {
            config,
            tokenizer,
            weights,
            format: WeightFormat::Safetensors,
        })
    }
}

/// Shard file names listed in a safetensors index, deduplicated and sorted.
pub fn shards(index: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(index)
        .with_context(|| format!("failed to read {}", index.display()))?;
    let json: serde_json::Value = serde_json::from_str(&content)?;
    let Some(map) = json.get("weight_map").and_then(|m| m.as_object()) else {
        bail!("no weight_map in {}", index.display());
    };

    Ok(map
        .values()
        .filter_map(|v| v.as_str())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect())
}

fn weight_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}
