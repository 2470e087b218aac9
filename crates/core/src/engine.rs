//! Process-wide inference context.
//!
//! The engine is built once at start-up and shared with request handlers by
//! reference. It chains the pieces of a chat completion together: acquire a
//! handle, render the prompt, generate, clean the output.

use crate::{
    CacheConfig, ChatMessage, ModelCache, Registry, Result, Runtime, SamplingParams,
    executor::{self, GenerationResult},
    translator::{self, RuntimeTemplate},
};
use compact_str::CompactString;
use parking_lot::Mutex;
use std::{path::PathBuf, sync::Arc};

/// A chat completion request after wire-level validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Logical model name (already normalized).
    pub model: CompactString,
    /// The conversation, in order.
    pub messages: Vec<ChatMessage>,
    /// Sampling parameters.
    pub params: SamplingParams,
}

/// A finished chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Externally visible completion text.
    pub content: String,
    /// Generation accounting.
    pub generation: GenerationResult,
}

/// Health snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    /// Resident model names, least-recently-used first.
    pub loaded_models: Vec<CompactString>,
    /// Cache capacity.
    pub max_loaded: usize,
    /// Local artifact root.
    pub models_dir: PathBuf,
    /// Whether inference runs on an accelerator.
    pub gpu: bool,
}

/// Shared inference context: registry, model cache and runtime.
pub struct Engine<R: Runtime> {
    runtime: Arc<R>,
    registry: Arc<Registry>,
    cache: ModelCache<R>,
    /// Keeps acquire + generate to one request at a time.
    gate: Mutex<()>,
}

impl<R: Runtime> Engine<R> {
    /// Create an engine with an empty cache.
    pub fn new(runtime: R, registry: Registry, config: &CacheConfig) -> Result<Self> {
        let runtime = Arc::new(runtime);
        let registry = Arc::new(registry);
        let cache = ModelCache::new(Arc::clone(&runtime), Arc::clone(&registry), config)?;
        Ok(Self {
            runtime,
            registry,
            cache,
            gate: Mutex::new(()),
        })
    }

    /// Run one chat completion to the end.
    ///
    /// Blocks for the whole load + generation; call from a blocking thread.
    pub fn complete(&self, request: &GenerationRequest) -> Result<Completion> {
        let _turn = self.gate.lock();

        let handle = self.cache.acquire(&request.model)?;
        let prompt = translator::render(
            &RuntimeTemplate::new(self.runtime.as_ref(), handle.as_ref()),
            &request.messages,
        );

        let generation = executor::run(
            self.runtime.as_ref(),
            handle.as_ref(),
            &prompt,
            &request.params,
        )?;
        tracing::info!(
            "[{}] {} tokens in {:.1}s ({:.1} tok/s)",
            request.model,
            generation.completion_tokens,
            generation.elapsed.as_secs_f64(),
            generation.tokens_per_sec()
        );

        Ok(Completion {
            content: translator::clean(&generation.text),
            generation,
        })
    }

    /// Registered model names, sorted. Never triggers a load.
    pub fn models(&self) -> Vec<CompactString> {
        self.registry.names().map(CompactString::from).collect()
    }

    /// Current health snapshot.
    pub fn health(&self) -> Health {
        Health {
            loaded_models: self.cache.loaded(),
            max_loaded: self.cache.capacity(),
            models_dir: self.cache.models_dir().to_path_buf(),
            gpu: self.runtime.accelerated(),
        }
    }

    /// The model cache.
    pub fn cache(&self) -> &ModelCache<R> {
        &self.cache
    }

    /// The registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The runtime.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Release every loaded model.
    pub fn shutdown(&self) {
        let _turn = self.gate.lock();
        self.cache.clear();
    }
}
