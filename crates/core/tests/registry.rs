//! Tests for the agent fallback registry.

use compact_str::CompactString;
use intelhealth_core::{
    Registry,
    registry::{BASE_LARGE, BASE_SMALL},
};
use std::collections::BTreeMap;

#[test]
fn default_agents_resolve_to_base_models() {
    let registry = Registry::default();
    assert_eq!(registry.len(), 8);
    assert_eq!(registry.lookup_fallback("symptom_normalizer"), Some(BASE_SMALL));
    assert_eq!(registry.lookup_fallback("diagnosis_generator"), Some(BASE_LARGE));
    assert_eq!(registry.lookup_fallback("diagnosis_reviewer"), Some(BASE_LARGE));
}

#[test]
fn unknown_name_has_no_fallback() {
    let registry = Registry::default();
    assert_eq!(registry.lookup_fallback("triage_bot"), None);
}

#[test]
fn names_are_sorted() {
    let registry = Registry::default();
    let names: Vec<&str> = registry.names().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(names.first(), Some(&"diagnosis_generator"));
}

#[test]
fn overrides_replace_and_extend() {
    let mut overrides = BTreeMap::new();
    overrides.insert(
        CompactString::from("drug_recommender"),
        CompactString::from(BASE_LARGE),
    );
    overrides.insert(
        CompactString::from("triage_bot"),
        CompactString::from("Qwen/Qwen3-4B"),
    );

    let registry = Registry::default().with_overrides(&overrides);
    assert_eq!(registry.len(), 9);
    assert_eq!(registry.lookup_fallback("drug_recommender"), Some(BASE_LARGE));
    assert_eq!(registry.lookup_fallback("triage_bot"), Some("Qwen/Qwen3-4B"));
}

#[test]
fn empty_registry() {
    let registry = Registry::empty();
    assert!(registry.is_empty());
    assert_eq!(registry.names().count(), 0);
}
