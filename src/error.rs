use crate::enums::DataType;
use thiserror::Error;

/// Errors raised while assembling the graph.
///
/// These are precondition-style faults: they surface immediately at the
/// call that violates a construction rule and are never retried.
#[derive(Error, Debug, Clone)]
pub enum DesignError {
    #[error("Parameter with code '{code}' already exists on node {node}")]
    DuplicateParam { code: String, node: String },

    #[error("Node {node} has no output param '{code}'")]
    UnknownOutputParam { code: String, node: String },

    #[error("Node {node} has no input param '{code}'")]
    UnknownInputParam { code: String, node: String },

    #[error("Input param '{code}' of node {node} is already the target of a link")]
    ParamAlreadyLinked { code: String, node: String },

    #[error("Node number {number} already exists in the pipeline")]
    NodeNumberTaken { number: u32 },

    #[error("No node with number {number} in the pipeline")]
    UnknownNode { number: u32 },

    #[error("Decision node {node}: 'passthrough' must be linked before 'data' can be linked out")]
    PassthroughNotLinked { node: String },

    #[error("Asset '{asset_id}' resolved to function '{resolved}', but '{declared}' was declared")]
    FunctionMismatch {
        asset_id: String,
        declared: String,
        resolved: String,
    },

    #[error(transparent)]
    Resolver(#[from] ResolveError),
}

/// Errors raised only by the explicit validation passes.
///
/// Every variant names the offending node label (and param code where one
/// exists) so the message can be surfaced to the pipeline author as-is.
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Input node {label} not linked out")]
    InputNotLinkedOut { label: String },

    #[error("Output node {label} not linked in")]
    OutputNotLinkedIn { label: String },

    #[error("Node {label} not linked in")]
    NotLinkedIn { label: String },

    #[error("Node {label} not linked out")]
    NotLinkedOut { label: String },

    #[error(
        "The pipeline requires at least one asset or script node, along with both input and output nodes"
    )]
    MissingBoundaryNodes,

    #[error("Param {code} of node {label} is required")]
    RequiredParamUnset { code: String, label: String },

    #[error("Param {code} of node {label} should be defined and set")]
    PromptParamUnset { code: String, label: String },

    #[error(
        "Data type mismatch on link {from_label}.{from_param} -> {to_label}.{to_param}: {from_type} vs {to_type}"
    )]
    TypeMismatch {
        from_label: String,
        from_param: String,
        from_type: DataType,
        to_label: String,
        to_param: String,
        to_type: DataType,
    },
}

/// Errors produced by the external collaborators (asset resolver and
/// script uploader). Asset and script node construction surfaces these
/// unchanged, wrapped in [`DesignError::Resolver`].
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error("Asset '{0}' was not found in the platform catalog")]
    AssetNotFound(String),

    #[error("Failed to resolve asset '{asset_id}': {message}")]
    ResolutionFailed { asset_id: String, message: String },

    #[error("Failed to upload script '{path}': {message}")]
    UploadFailed { path: String, message: String },
}
