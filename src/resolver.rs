//! Trait seams for the external collaborators the designer calls into.
//!
//! The designer itself never talks to the platform: asset lookups and
//! script uploads are injected behind these traits, and the surrounding
//! transport layer (out of scope here) supplies the real implementations.

use crate::enums::DataType;
use crate::error::ResolveError;
use ahash::AHashMap;
use serde_json::Value;
use std::path::Path;

/// One declared parameter slot in a resolved asset's function spec.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub code: String,
    pub data_type: Option<DataType>,
    pub required: bool,
}

impl ParamSpec {
    pub fn new(code: impl Into<String>, data_type: Option<DataType>, required: bool) -> Self {
        Self {
            code: code.into(),
            data_type,
            required,
        }
    }
}

/// Everything the designer needs to know about a platform asset in order
/// to auto-populate an asset node.
#[derive(Debug, Clone)]
pub struct ResolvedAsset {
    pub id: String,
    /// The function the asset implements, e.g. `"translation"`.
    pub function: String,
    pub supplier: String,
    pub version: String,
    /// Input params declared by the function spec.
    pub input_params: Vec<ParamSpec>,
    /// Output params declared by the function spec.
    pub output_params: Vec<ParamSpec>,
    /// The asset's own parameter list. Utility assets enumerate these
    /// instead of the function spec's inputs.
    pub asset_params: Vec<ParamSpec>,
    /// Default literal values the asset carries for some of its inputs.
    pub defaults: AHashMap<String, Value>,
}

/// Resolves an asset identifier to its function spec.
///
/// Called exactly once per asset-node construction; a failure aborts the
/// construction and is never retried by this crate.
pub trait AssetResolver {
    fn resolve(&self, asset_id: &str) -> Result<ResolvedAsset, ResolveError>;
}

/// Result of uploading a local script to the platform.
#[derive(Debug, Clone)]
pub struct UploadedScript {
    pub file_id: String,
    pub metadata: AHashMap<String, Value>,
}

/// Uploads a local script file, yielding the file id a script node needs.
pub trait ScriptUploader {
    fn upload(&self, path: &Path) -> Result<UploadedScript, ResolveError>;
}
