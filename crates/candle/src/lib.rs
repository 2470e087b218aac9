//! Candle runtime for IntelHealth.
//!
//! Loads Qwen3 checkpoints exported as HuggingFace directories (or pulled
//! from the hub) and runs blocking generation on CPU, CUDA or Metal.

mod device;
mod loader;
mod model;
mod processor;
mod runtime;
pub mod template;

pub use {
    device::{Placement, detect as device},
    loader::{Artifacts, WeightFormat, shards},
    model::LocalModel,
    processor::ProcessorConfig,
    runtime::CandleRuntime,
};
