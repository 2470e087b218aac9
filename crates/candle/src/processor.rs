//! Logits processing

use candle_transformers::generation::{LogitsProcessor, Sampling};
use icore::Decoding;

/// Sampling configuration for one generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorConfig {
    /// The RNG seed; `None` draws a fresh one per generation.
    pub seed: Option<u64>,
    /// The decoding parameters.
    pub decoding: Decoding,
}

impl ProcessorConfig {
    /// Config for `decoding` with an optional fixed seed.
    pub fn new(decoding: Decoding, seed: Option<u64>) -> Self {
        Self { seed, decoding }
    }

    /// The sampling strategy.
    ///
    /// Greedy when sampling is off; nucleus sampling below `top_p == 1`.
    pub fn sampling(&self) -> Sampling {
        let Decoding {
            temperature,
            top_p,
            sample,
            ..
        } = self.decoding;
        if !sample {
            Sampling::ArgMax
        } else if top_p > 0.0 && top_p < 1.0 {
            Sampling::TopP {
                p: top_p,
                temperature,
            }
        } else {
            Sampling::All { temperature }
        }
    }

    /// Build the logits processor.
    pub fn build(&self) -> LogitsProcessor {
        let seed = self.seed.unwrap_or_else(rand::random);
        LogitsProcessor::from_sampling(seed, self.sampling())
    }
}
