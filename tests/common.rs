//! Common test utilities: a mock asset catalog, a mock script uploader
//! and ready-made pipeline builders.
use ahash::AHashMap;
use pipewright::prelude::*;
use pipewright::resolver::{ParamSpec, ResolvedAsset, UploadedScript};
use serde_json::json;
use std::path::Path;

/// In-memory stand-in for the platform asset catalog.
///
/// Known assets:
/// - `translate-en-de`: translation, `text` + `sourcelanguage` in
///   (`sourcelanguage` defaulted to `"en"`), `data` out
/// - `speech-rec`: speech recognition, `source_audio` in, `data` out
/// - `llm-1`: text generation, `text`/`prompt`/`temperature` in, `data` out
/// - `util-1`: utility with a required `code` asset param
/// - `wer-1`: a word-error-rate metric
/// - `seg-1` / `recon-1`: an audio segmentor and a text reconstructor
pub struct MockCatalog;

impl AssetResolver for MockCatalog {
    fn resolve(&self, asset_id: &str) -> std::result::Result<ResolvedAsset, ResolveError> {
        match asset_id {
            "translate-en-de" => Ok(ResolvedAsset {
                id: asset_id.to_string(),
                function: "translation".to_string(),
                supplier: "acme".to_string(),
                version: "1.0".to_string(),
                input_params: vec![
                    ParamSpec::new("text", Some(DataType::Text), true),
                    ParamSpec::new("sourcelanguage", Some(DataType::Label), true),
                ],
                output_params: vec![ParamSpec::new("data", Some(DataType::Text), false)],
                asset_params: vec![],
                defaults: AHashMap::from_iter([("sourcelanguage".to_string(), json!("en"))]),
            }),
            "speech-rec" => Ok(ResolvedAsset {
                id: asset_id.to_string(),
                function: "speech-recognition".to_string(),
                supplier: "acme".to_string(),
                version: "2.3".to_string(),
                input_params: vec![ParamSpec::new("source_audio", Some(DataType::Audio), true)],
                output_params: vec![ParamSpec::new("data", Some(DataType::Text), false)],
                asset_params: vec![],
                defaults: AHashMap::new(),
            }),
            "llm-1" => Ok(ResolvedAsset {
                id: asset_id.to_string(),
                function: "text-generation".to_string(),
                supplier: "acme".to_string(),
                version: "4.0".to_string(),
                input_params: vec![
                    ParamSpec::new("text", Some(DataType::Text), true),
                    ParamSpec::new("prompt", Some(DataType::Text), false),
                    ParamSpec::new("temperature", Some(DataType::Number), false),
                ],
                output_params: vec![ParamSpec::new("data", Some(DataType::Text), false)],
                asset_params: vec![],
                defaults: AHashMap::new(),
            }),
            "util-1" => Ok(ResolvedAsset {
                id: asset_id.to_string(),
                function: "utility".to_string(),
                supplier: "acme".to_string(),
                version: "0.1".to_string(),
                input_params: vec![],
                output_params: vec![ParamSpec::new("data", Some(DataType::Text), false)],
                asset_params: vec![ParamSpec::new("code", Some(DataType::Text), true)],
                defaults: AHashMap::new(),
            }),
            "seg-1" => Ok(ResolvedAsset {
                id: asset_id.to_string(),
                function: "split-on-silence".to_string(),
                supplier: "acme".to_string(),
                version: "1.2".to_string(),
                input_params: vec![ParamSpec::new("source_audio", Some(DataType::Audio), true)],
                output_params: vec![],
                asset_params: vec![],
                defaults: AHashMap::new(),
            }),
            "wer-1" => Ok(ResolvedAsset {
                id: asset_id.to_string(),
                function: "wer".to_string(),
                supplier: "acme".to_string(),
                version: "1.0".to_string(),
                input_params: vec![
                    ParamSpec::new("hypotheses", Some(DataType::Text), true),
                    ParamSpec::new("references", Some(DataType::Text), true),
                ],
                output_params: vec![ParamSpec::new("data", Some(DataType::Number), false)],
                asset_params: vec![],
                defaults: AHashMap::new(),
            }),
            "recon-1" => Ok(ResolvedAsset {
                id: asset_id.to_string(),
                function: "text-reconstruction".to_string(),
                supplier: "acme".to_string(),
                version: "1.2".to_string(),
                input_params: vec![ParamSpec::new("text", Some(DataType::Text), true)],
                output_params: vec![ParamSpec::new("data", Some(DataType::Text), false)],
                asset_params: vec![],
                defaults: AHashMap::new(),
            }),
            other => Err(ResolveError::AssetNotFound(other.to_string())),
        }
    }
}

/// Uploader that never touches the filesystem: the file id is derived
/// from the path.
#[allow(dead_code)]
pub struct MockUploader;

impl ScriptUploader for MockUploader {
    fn upload(&self, path: &Path) -> std::result::Result<UploadedScript, ResolveError> {
        Ok(UploadedScript {
            file_id: format!("file-{}", path.display()),
            metadata: AHashMap::new(),
        })
    }
}

/// Routes test-scoped tracing output through the test harness so debug
/// logs show up on failures.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds the canonical three-node pipeline: input -> translation ->
/// output, fully linked. Returns the pipeline and the three node ids.
#[allow(dead_code)]
pub fn translation_pipeline() -> (Pipeline, NodeId, NodeId, NodeId) {
    let catalog = MockCatalog;
    let mut pipeline = Pipeline::new();
    let input = pipeline.input().expect("attach input");
    let model = pipeline
        .asset(&catalog, "translate-en-de")
        .expect("resolve translation asset");
    pipeline
        .link(input, "input", model, "text")
        .expect("link input to model");
    let output = pipeline
        .use_output(model, "data")
        .expect("link model to output");
    (pipeline, input, model, output)
}

/// Builds an input -> text-generation -> output pipeline without any
/// prompt set yet.
#[allow(dead_code)]
pub fn llm_pipeline() -> (Pipeline, NodeId, NodeId, NodeId) {
    let catalog = MockCatalog;
    let mut pipeline = Pipeline::new();
    let input = pipeline.input().expect("attach input");
    let model = pipeline.asset(&catalog, "llm-1").expect("resolve llm asset");
    pipeline
        .link(input, "input", model, "text")
        .expect("link input to model");
    let output = pipeline
        .use_output(model, "data")
        .expect("link model to output");
    (pipeline, input, model, output)
}
