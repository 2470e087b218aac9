//! A loaded checkpoint: weights, tokenizer and stop tokens.

use crate::{Artifacts, Placement, loader::WeightFormat};
use anyhow::{Context, Result, anyhow};
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::qwen3::{Config, ModelForCausalLM};
use parking_lot::Mutex;
use serde::Deserialize;
use tokenizers::Tokenizer;

/// Tokens that end a chat turn in Qwen checkpoints.
const STOP_TOKENS: [&str; 2] = ["<|im_end|>", "<|endoftext|>"];

/// The fields of `config.json` read besides the architecture config.
#[derive(Debug, Default, Deserialize)]
struct Header {
    #[serde(default)]
    model_type: String,
    #[serde(default)]
    eos_token_id: Option<EosTokens>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EosTokens {
    One(u32),
    Many(Vec<u32>),
}

/// A resident causal language model.
pub struct LocalModel {
    /// Weights plus KV cache. Forward passes mutate the cache.
    model: Mutex<ModelForCausalLM>,
    tokenizer: Tokenizer,
    model_type: String,
    eos: Vec<u32>,
    device: Device,
}

impl LocalModel {
    /// Load a checkpoint onto `placement`.
    pub fn load(artifacts: &Artifacts, placement: &Placement) -> Result<Self> {
        let raw = std::fs::read_to_string(&artifacts.config)
            .with_context(|| format!("failed to read {}", artifacts.config.display()))?;
        let header: Header = serde_json::from_str(&raw)?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("unsupported model config in {}", artifacts.config.display()))?;

        let tokenizer = Tokenizer::from_file(&artifacts.tokenizer).map_err(|e| anyhow!(e))?;
        let vb = match artifacts.format {
            // SAFETY: the weight files are not modified while mapped.
            WeightFormat::Safetensors => unsafe {
                VarBuilder::from_mmaped_safetensors(
                    &artifacts.weights,
                    placement.dtype,
                    &placement.device,
                )?
            },
            WeightFormat::Pytorch => {
                let path = artifacts
                    .weights
                    .first()
                    .ok_or_else(|| anyhow!("no pytorch checkpoint"))?;
                VarBuilder::from_pth(path, placement.dtype, &placement.device)?
            }
        };
        let model = ModelForCausalLM::new(&config, vb)?;

        let mut eos: Vec<u32> = STOP_TOKENS
            .iter()
            .filter_map(|token| tokenizer.token_to_id(token))
            .collect();
        match header.eos_token_id {
            Some(EosTokens::One(id)) => eos.push(id),
            Some(EosTokens::Many(ids)) => eos.extend(ids),
            None => {}
        }
        eos.sort_unstable();
        eos.dedup();

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            model_type: header.model_type,
            eos,
            device: placement.device.clone(),
        })
    }

    /// `model_type` from `config.json`.
    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    /// Token ids that end generation.
    pub fn eos(&self) -> &[u32] {
        &self.eos
    }

    /// Encode text without adding special tokens; the chat template carries them.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self.tokenizer.encode(text, false).map_err(|e| anyhow!(e))?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Decode ids, skipping special tokens.
    pub fn decode(&self, tokens: &[u32]) -> Result<String> {
        self.tokenizer.decode(tokens, true).map_err(|e| anyhow!(e))
    }

    /// Run `step` with exclusive access to the weights and a fresh KV cache.
    pub fn with_fresh_cache<T>(
        &self,
        step: impl FnOnce(&mut ModelForCausalLM, &Device) -> Result<T>,
    ) -> Result<T> {
        let mut model = self.model.lock();
        model.clear_kv_cache();
        step(&mut *model, &self.device)
    }

    /// Logits of the last position for `tokens` fed at `offset`.
    pub fn forward(
        model: &mut ModelForCausalLM,
        device: &Device,
        tokens: &[u32],
        offset: usize,
    ) -> Result<Tensor> {
        let input = Tensor::new(tokens, device)?.unsqueeze(0)?;
        let logits = model.forward(&input, offset)?;
        Ok(logits
            .squeeze(0)?
            .squeeze(0)?
            .to_dtype(candle_core::DType::F32)?)
    }
}

impl std::fmt::Debug for LocalModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalModel")
            .field("model_type", &self.model_type)
            .field("eos", &self.eos)
            .field("device", &self.device)
            .finish()
    }
}
