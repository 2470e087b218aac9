//! Model runtime boundary.

use crate::{ChatMessage, ModelSource};
use anyhow::Result;

/// Decoding parameters handed to [`Runtime::generate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoding {
    /// Sampling temperature, already clamped to a positive floor.
    pub temperature: f64,
    /// Nucleus sampling threshold.
    pub top_p: f64,
    /// Whether to sample at all; `false` selects greedy decoding.
    pub sample: bool,
    /// Upper bound on newly generated tokens.
    pub max_new_tokens: usize,
}

/// A model runtime: loads handles and runs blocking inference on them.
///
/// All methods are synchronous and may take seconds; async callers are
/// expected to move them onto a blocking thread.
pub trait Runtime: Send + Sync + 'static {
    /// Loaded model state (weights + tokenizer).
    type Handle: Send + Sync + 'static;

    /// Construct a handle from a resolved source.
    fn load(&self, source: &ModelSource) -> Result<Self::Handle>;

    /// Render `messages` with the model's own chat template, ending with an
    /// open assistant turn.
    fn chat_template(&self, handle: &Self::Handle, messages: &[ChatMessage]) -> Result<String>;

    /// Encode prompt text into token ids.
    fn tokenize(&self, handle: &Self::Handle, prompt: &str) -> Result<Vec<u32>>;

    /// Generate a continuation of `prompt`.
    ///
    /// Returns the full sequence: the prompt tokens followed by the new ones.
    fn generate(&self, handle: &Self::Handle, prompt: &[u32], decoding: &Decoding)
    -> Result<Vec<u32>>;

    /// Decode token ids into text, skipping special tokens.
    fn detokenize(&self, handle: &Self::Handle, tokens: &[u32]) -> Result<String>;

    /// Whether inference runs on an accelerator.
    fn accelerated(&self) -> bool {
        false
    }
}
