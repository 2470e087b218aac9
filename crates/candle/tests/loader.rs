//! Tests for local checkpoint discovery.

use intelhealth_candle::{Artifacts, WeightFormat};
use std::fs;

fn checkpoint(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        fs::write(dir.path().join(file), b"").unwrap();
    }
    dir
}

#[test]
fn discovers_sharded_safetensors_in_order() {
    let dir = checkpoint(&[
        "config.json",
        "tokenizer.json",
        "model-00002-of-00002.safetensors",
        "model-00001-of-00002.safetensors",
    ]);
    let artifacts = Artifacts::discover(dir.path()).unwrap();
    assert_eq!(artifacts.format, WeightFormat::Safetensors);
    assert_eq!(
        artifacts.weights,
        vec![
            dir.path().join("model-00001-of-00002.safetensors"),
            dir.path().join("model-00002-of-00002.safetensors"),
        ]
    );
    assert_eq!(artifacts.config, dir.path().join("config.json"));
}

#[test]
fn safetensors_win_over_pytorch() {
    let dir = checkpoint(&[
        "config.json",
        "tokenizer.json",
        "pytorch_model.bin",
        "model.safetensors",
    ]);
    let artifacts = Artifacts::discover(dir.path()).unwrap();
    assert_eq!(artifacts.format, WeightFormat::Safetensors);
    assert_eq!(artifacts.weights, vec![dir.path().join("model.safetensors")]);
}

#[test]
fn falls_back_to_pytorch_checkpoint() {
    let dir = checkpoint(&["config.json", "tokenizer.json", "pytorch_model.bin"]);
    let artifacts = Artifacts::discover(dir.path()).unwrap();
    assert_eq!(artifacts.format, WeightFormat::Pytorch);
    assert_eq!(artifacts.weights, vec![dir.path().join("pytorch_model.bin")]);
}

#[test]
fn missing_files_are_reported() {
    let dir = checkpoint(&["config.json", "model.safetensors"]);
    let err = Artifacts::discover(dir.path()).unwrap_err();
    assert!(err.to_string().contains("tokenizer.json"));

    let dir = checkpoint(&["config.json", "tokenizer.json"]);
    let err = Artifacts::discover(dir.path()).unwrap_err();
    assert!(err.to_string().contains("no weight files"));
}

#[test]
fn reads_shard_names_from_index() {
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("model.safetensors.index.json");
    fs::write(
        &index,
        r#"{"metadata":{},"weight_map":{
            "lm_head.weight":"model-00002-of-00002.safetensors",
            "model.embed_tokens.weight":"model-00001-of-00002.safetensors",
            "model.norm.weight":"model-00002-of-00002.safetensors"}}"#,
    )
    .unwrap();
    assert_eq!(
        intelhealth_candle::shards(&index).unwrap(),
        vec![
            "model-00001-of-00002.safetensors".to_owned(),
            "model-00002-of-00002.safetensors".to_owned(),
        ]
    );
}
