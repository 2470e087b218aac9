//! Tests for sampling strategy selection.

use candle_transformers::generation::Sampling;
use icore::Decoding;
use intelhealth_candle::ProcessorConfig;

fn decoding(temperature: f64, top_p: f64, sample: bool) -> Decoding {
    Decoding {
        temperature,
        top_p,
        sample,
        max_new_tokens: 16,
    }
}

#[test]
fn greedy_without_sampling() {
    let config = ProcessorConfig::new(decoding(0.01, 0.9, false), None);
    assert!(matches!(config.sampling(), Sampling::ArgMax));
}

#[test]
fn nucleus_sampling_below_one() {
    let config = ProcessorConfig::new(decoding(0.2, 0.9, true), Some(7));
    match config.sampling() {
        Sampling::TopP { p, temperature } => {
            assert_eq!(p, 0.9);
            assert_eq!(temperature, 0.2);
        }
        other => panic!("unexpected sampling {other:?}"),
    }
}

#[test]
fn full_distribution_at_top_p_one() {
    let config = ProcessorConfig::new(decoding(0.7, 1.0, true), None);
    assert!(matches!(config.sampling(), Sampling::All { temperature } if temperature == 0.7));
}

#[test]
fn out_of_range_top_p_samples_full_distribution() {
    for top_p in [0.0, 1.5] {
        let config = ProcessorConfig::new(decoding(0.7, top_p, true), None);
        assert!(matches!(config.sampling(), Sampling::All { .. }));
    }
}
