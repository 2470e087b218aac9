//! Tests for the generation executor.

use intelhealth_core::{
    ModelSource, Runtime, SamplingParams,
    executor::{TEMPERATURE_FLOOR, run},
    testing::MockRuntime,
};

fn loaded() -> (MockRuntime, <MockRuntime as Runtime>::Handle) {
    let runtime = MockRuntime::new();
    let handle = runtime
        .load(&ModelSource::Remote("org/model".into()))
        .unwrap();
    (runtime, handle)
}

#[test]
fn zero_temperature_is_greedy_with_floor() {
    let params = SamplingParams {
        temperature: 0.0,
        ..SamplingParams::default()
    };
    let decoding = params.decoding();
    assert!(!decoding.sample);
    assert_eq!(decoding.temperature, TEMPERATURE_FLOOR);
}

#[test]
fn positive_temperature_samples() {
    let params = SamplingParams {
        temperature: 0.7,
        top_p: 0.8,
        max_tokens: 64,
    };
    let decoding = params.decoding();
    assert!(decoding.sample);
    assert_eq!(decoding.temperature, 0.7);
    assert_eq!(decoding.top_p, 0.8);
    assert_eq!(decoding.max_new_tokens, 64);
}

#[test]
fn tiny_temperature_is_clamped_but_still_samples() {
    let decoding = SamplingParams {
        temperature: 0.001,
        ..SamplingParams::default()
    }
    .decoding();
    assert!(decoding.sample);
    assert_eq!(decoding.temperature, TEMPERATURE_FLOOR);
}

#[test]
fn defaults_match_wire_defaults() {
    let params = SamplingParams::default();
    assert_eq!(params.temperature, 0.2);
    assert_eq!(params.top_p, 0.9);
    assert_eq!(params.max_tokens, 1000);
}

#[test]
fn token_accounting_splits_at_prompt_boundary() {
    let (runtime, handle) = loaded();
    let result = run(&runtime, &handle, "hello", &SamplingParams::default()).unwrap();

    let expected = runtime.reply(&handle, &SamplingParams::default().decoding());
    assert_eq!(result.prompt_tokens, 5);
    assert_eq!(result.completion_tokens, expected.chars().count());
    assert_eq!(result.text, expected);
    assert_eq!(result.total_tokens(), 5 + expected.chars().count());
}

#[test]
fn max_tokens_bounds_the_completion() {
    let (runtime, handle) = loaded();
    let params = SamplingParams {
        max_tokens: 3,
        ..SamplingParams::default()
    };
    let result = run(&runtime, &handle, "a much longer prompt", &params).unwrap();
    assert_eq!(result.completion_tokens, 3);
    assert_eq!(result.prompt_tokens, 20);
}

#[test]
fn greedy_runs_are_deterministic() {
    let (runtime, handle) = loaded();
    let params = SamplingParams {
        temperature: 0.0,
        ..SamplingParams::default()
    };
    let first = run(&runtime, &handle, "same prompt", &params).unwrap();
    let second = run(&runtime, &handle, "same prompt", &params).unwrap();
    assert_eq!(first.text, second.text);
    assert!(runtime.decodings().iter().all(|d| !d.sample));
}
