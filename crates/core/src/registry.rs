//! Static agent → fallback model registry.
//!
//! Agents that have not been fine-tuned yet are served by a shared base
//! model. The registry is populated once at start-up and never mutated
//! afterwards; it is also the list advertised by `GET /v1/models`.

use compact_str::CompactString;
use std::collections::BTreeMap;

/// Small base model shared by the lightweight grading/normalizing agents.
pub const BASE_SMALL: &str = "Qwen/Qwen3-0.6B";

/// Larger base model for the generative diagnosis agents.
pub const BASE_LARGE: &str = "Qwen/Qwen3-1.7B";

/// Built-in agent table.
const DEFAULT_AGENTS: &[(&str, &str)] = &[
    ("symptom_normalizer", BASE_SMALL),
    ("symptom_quality_grader", BASE_SMALL),
    ("rag_relevance_grader", BASE_SMALL),
    ("diagnosis_generator", BASE_LARGE),
    ("drug_evidence_grader", BASE_SMALL),
    ("drug_recommender", BASE_SMALL),
    ("diagnosis_reviewer", BASE_LARGE),
    ("output_formatter", BASE_SMALL),
];

/// Logical model name → remote fallback identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    fallbacks: BTreeMap<CompactString, CompactString>,
}

impl Registry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            fallbacks: BTreeMap::new(),
        }
    }

    /// Build a registry from `(name, fallback)` pairs.
    pub fn from_entries<N, F>(entries: impl IntoIterator<Item = (N, F)>) -> Self
    where
        N: Into<CompactString>,
        F: Into<CompactString>,
    {
        Self {
            fallbacks: entries
                .into_iter()
                .map(|(name, fallback)| (name.into(), fallback.into()))
                .collect(),
        }
    }

    /// Return a copy of this registry with `overrides` added on top.
    ///
    /// Entries in `overrides` replace built-in entries of the same name.
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a CompactString, &'a CompactString)>,
    ) -> Self {
        for (name, fallback) in overrides {
            self.fallbacks.insert(name.clone(), fallback.clone());
        }
        self
    }

    /// Remote fallback identifier for `name`, if one is registered.
    pub fn lookup_fallback(&self, name: &str) -> Option<&str> {
        self.fallbacks.get(name).map(CompactString::as_str)
    }

    /// All registered logical names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fallbacks.keys().map(CompactString::as_str)
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.fallbacks.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::from_entries(DEFAULT_AGENTS.iter().copied())
    }
}
