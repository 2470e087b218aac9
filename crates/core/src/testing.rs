//! Deterministic in-memory runtime for tests.
//!
//! Tokens are unicode scalar values, so tokenize/detokenize are exact
//! inverses and prompt lengths are easy to predict. Every load is recorded.

use crate::{ChatMessage, Decoding, ModelSource, Runtime};
use anyhow::{Result, bail};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A loaded mock model.
#[derive(Debug, PartialEq, Eq)]
pub struct MockHandle {
    /// Sequence number of the load that produced this handle.
    pub id: usize,
    /// Where it was loaded from.
    pub source: ModelSource,
}

impl MockHandle {
    /// Short label of the source: the directory name or the remote id.
    pub fn label(&self) -> String {
        match &self.source {
            ModelSource::Local(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            ModelSource::Remote(id) => id.to_string(),
        }
    }
}

/// Mock runtime with knobs for the failure paths.
#[derive(Debug, Default)]
pub struct MockRuntime {
    loads: Mutex<Vec<ModelSource>>,
    next_id: AtomicUsize,
    decodings: Mutex<Vec<Decoding>>,
    /// Sources whose load fails.
    failing: Vec<ModelSource>,
    /// Whether `chat_template` succeeds.
    template: bool,
    /// Prefix every completion with a reasoning span.
    reasoning: bool,
}

impl MockRuntime {
    /// Runtime with a working chat template.
    pub fn new() -> Self {
        Self {
            template: true,
            ..Self::default()
        }
    }

    /// Runtime whose chat template always fails.
    pub fn without_template() -> Self {
        Self::default()
    }

    /// Make loads of `source` fail.
    pub fn failing_on(mut self, source: ModelSource) -> Self {
        self.failing.push(source);
        self
    }

    /// Emit a `<think>` span before every completion.
    pub fn with_reasoning(mut self) -> Self {
        self.reasoning = true;
        self
    }

    /// Sources loaded so far, in order.
    pub fn loads(&self) -> Vec<ModelSource> {
        self.loads.lock().clone()
    }

    /// Number of loads so far.
    pub fn load_count(&self) -> usize {
        self.loads.lock().len()
    }

    /// Decoding parameters of every generate call, in order.
    pub fn decodings(&self) -> Vec<Decoding> {
        self.decodings.lock().clone()
    }

    /// The prompt text `chat_template` produces for `messages`.
    pub fn template_prompt(messages: &[ChatMessage]) -> String {
        let mut prompt = String::new();
        for message in messages {
            prompt.push_str(&format!("[{}] {}\n", message.role, message.content));
        }
        prompt.push_str("[assistant] ");
        prompt
    }

    /// The completion text a handle produces, before truncation.
    pub fn reply(&self, handle: &MockHandle, decoding: &Decoding) -> String {
        let mode = if decoding.sample { "sampled" } else { "greedy" };
        let reply = format!("{} {mode} reply", handle.label());
        if self.reasoning {
            format!("<think>\nweighing the symptoms\n</think>\n\n{reply}")
        } else {
            reply
        }
    }
}

impl Runtime for MockRuntime {
    type Handle = MockHandle;

    fn load(&self, source: &ModelSource) -> Result<MockHandle> {
        if self.failing.contains(source) {
            bail!("corrupt weights at {source}");
        }
        self.loads.lock().push(source.clone());
        Ok(MockHandle {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            source: source.clone(),
        })
    }

    fn chat_template(&self, _handle: &MockHandle, messages: &[ChatMessage]) -> Result<String> {
        if !self.template {
            bail!("no chat template configured");
        }
        Ok(Self::template_prompt(messages))
    }

    fn tokenize(&self, _handle: &MockHandle, prompt: &str) -> Result<Vec<u32>> {
        Ok(prompt.chars().map(u32::from).collect())
    }

    fn generate(
        &self,
        handle: &MockHandle,
        prompt: &[u32],
        decoding: &Decoding,
    ) -> Result<Vec<u32>> {
        self.decodings.lock().push(*decoding);
        let mut output = prompt.to_vec();
        output.extend(
            self.reply(handle, decoding)
                .chars()
                .take(decoding.max_new_tokens)
                .map(u32::from),
        );
        Ok(output)
    }

    fn detokenize(&self, _handle: &MockHandle, tokens: &[u32]) -> Result<String> {
        Ok(tokens.iter().filter_map(|&t| char::from_u32(t)).collect())
    }
}
