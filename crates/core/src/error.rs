//! Error taxonomy shared by the cache, executor and engine.

use compact_str::CompactString;
use std::path::PathBuf;

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core crate.
///
/// Prompt-template failures never surface here; the translator falls back
/// to ChatML instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No local artifact and no registry fallback for the requested name.
    #[error("model '{name}' not found (no local artifact at {}, and no fallback mapping)", .searched.display())]
    NotFound {
        /// The requested logical name.
        name: CompactString,
        /// The directory that was checked for a local artifact.
        searched: PathBuf,
    },

    /// The runtime failed to construct a handle.
    #[error("failed to load model '{name}': {source}")]
    Load {
        /// The requested logical name.
        name: CompactString,
        /// The underlying runtime error.
        #[source]
        source: anyhow::Error,
    },

    /// Tokenization, generation or detokenization failed.
    #[error("generation failed: {0}")]
    Generation(#[source] anyhow::Error),

    /// Invalid configuration supplied at start-up.
    #[error("invalid configuration: {0}")]
    Config(String),
}
