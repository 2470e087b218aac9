//! Single synchronous generation call with token accounting.

use crate::{Decoding, Error, Result, Runtime};
use std::time::{Duration, Instant};

/// Lowest temperature forwarded to the runtime.
///
/// A requested temperature of zero disables sampling instead; the floor only
/// keeps the runtime away from dividing by zero.
pub const TEMPERATURE_FLOOR: f64 = 0.01;

/// Caller-facing sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Requested temperature; `0` selects greedy decoding.
    pub temperature: f64,
    /// Nucleus sampling threshold.
    pub top_p: f64,
    /// Upper bound on newly generated tokens.
    pub max_tokens: usize,
}

impl SamplingParams {
    /// Translate into runtime decoding parameters.
    pub fn decoding(&self) -> Decoding {
        Decoding {
            temperature: self.temperature.max(TEMPERATURE_FLOOR),
            top_p: self.top_p,
            sample: self.temperature > 0.0,
            max_new_tokens: self.max_tokens,
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.9,
            max_tokens: 1000,
        }
    }
}

/// Output of one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    /// Decoded completion (reasoning spans not yet stripped).
    pub text: String,
    /// Tokens in the rendered prompt.
    pub prompt_tokens: usize,
    /// Tokens produced past the prompt boundary.
    pub completion_tokens: usize,
    /// Wall time spent in the runtime's generate call.
    pub elapsed: Duration,
}

impl GenerationResult {
    /// Prompt plus completion tokens.
    pub fn total_tokens(&self) -> usize {
        self.prompt_tokens + self.completion_tokens
    }

    /// Generation throughput, guarded against near-zero timings.
    pub fn tokens_per_sec(&self) -> f64 {
        self.completion_tokens as f64 / self.elapsed.as_secs_f64().max(0.01)
    }
}

/// Run one generation of `prompt` against `handle`.
///
/// The completion count is the output length minus the prompt length, never
/// a re-tokenization of the decoded text.
pub fn run<R: Runtime>(
    runtime: &R,
    handle: &R::Handle,
    prompt: &str,
    params: &SamplingParams,
) -> Result<GenerationResult> {
    let input = runtime.tokenize(handle, prompt).map_err(Error::Generation)?;
    let prompt_tokens = input.len();

    let started = Instant::now();
    let output = runtime
        .generate(handle, &input, &params.decoding())
        .map_err(Error::Generation)?;
    let elapsed = started.elapsed();

    let new_tokens = output.get(prompt_tokens..).unwrap_or_default();
    let text = runtime
        .detokenize(handle, new_tokens)
        .map_err(Error::Generation)?
        .trim()
        .to_owned();

    Ok(GenerationResult {
        text,
        prompt_tokens,
        completion_tokens: new_tokens.len(),
        elapsed,
    })
}
