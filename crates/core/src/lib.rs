//! IntelHealth core — lazily loaded, LRU-bounded model cache and the
//! chat-completion translation around it.
//!
//! The heavy lifting (weights, tokenizer, sampling) lives behind the
//! [`Runtime`] trait; this crate decides *which* model serves a logical agent
//! name, keeps a bounded number of them resident, and turns chat messages
//! into prompts and generations back into clean text.

pub use {
    cache::{CacheEntry, CacheStats, ModelCache},
    config::{CacheConfig, ServeConfig, ServerConfig},
    engine::{Completion, Engine, GenerationRequest, Health},
    error::{Error, Result},
    executor::{GenerationResult, SamplingParams},
    message::ChatMessage,
    registry::Registry,
    resolver::ModelSource,
    runtime::{Decoding, Runtime},
    translator::{ChatMl, PromptFormatter, RuntimeTemplate},
};

pub mod cache;
pub mod config;
pub mod engine;
mod error;
pub mod executor;
mod message;
pub mod registry;
pub mod resolver;
mod runtime;
pub mod translator;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
