//! [`Runtime`] implementation over candle.

use crate::{Artifacts, LocalModel, Placement, ProcessorConfig, template};
use anyhow::Result;
use icore::{ChatMessage, Decoding, ModelSource, Runtime};
use std::time::Instant;

/// Candle-backed runtime.
#[derive(Debug, Clone)]
pub struct CandleRuntime {
    placement: Placement,
    seed: Option<u64>,
}

impl CandleRuntime {
    /// Runtime on `placement`; sampling draws a fresh seed per generation.
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            seed: None,
        }
    }

    /// Fix the sampling seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Runtime for CandleRuntime {
    type Handle = LocalModel;

    fn load(&self, source: &ModelSource) -> Result<LocalModel> {
        let started = Instant::now();
        let artifacts = Artifacts::fetch(source)?;
        tracing::debug!(
            "{} weight file(s) for {source} found in {:.2}s",
            artifacts.weights.len(),
            started.elapsed().as_secs_f64()
        );
        LocalModel::load(&artifacts, &self.placement)
    }

    fn chat_template(&self, handle: &LocalModel, messages: &[ChatMessage]) -> Result<String> {
        template::for_model_type(handle.model_type(), messages)
    }

    fn tokenize(&self, handle: &LocalModel, prompt: &str) -> Result<Vec<u32>> {
        handle.encode(prompt)
    }

    fn generate(
        &self,
        handle: &LocalModel,
        prompt: &[u32],
        decoding: &Decoding,
    ) -> Result<Vec<u32>> {
        let mut processor = ProcessorConfig::new(*decoding, self.seed).build();
        let mut tokens = prompt.to_vec();
        if prompt.is_empty() || decoding.max_new_tokens == 0 {
            return Ok(tokens);
        }

        handle.with_fresh_cache(|model, device| {
            let logits = LocalModel::forward(model, device, prompt, 0)?;
            let mut next = processor.sample(&logits)?;
            loop {
                tokens.push(next);
                let generated = tokens.len() - prompt.len();
                if handle.eos().contains(&next) || generated >= decoding.max_new_tokens {
                    break;
                }
                let logits = LocalModel::forward(model, device, &[next], tokens.len() - 1)?;
                next = processor.sample(&logits)?;
            }
            Ok(())
        })?;

        Ok(tokens)
    }

    fn detokenize(&self, handle: &LocalModel, tokens: &[u32]) -> Result<String> {
        handle.decode(tokens)
    }

    fn accelerated(&self) -> bool {
        self.placement.accelerated()
    }
}
