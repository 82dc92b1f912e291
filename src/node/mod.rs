//! Graph vertices: the base node model plus its typed variants.
//!
//! A node owns one input and one output param collection. Variant-specific
//! payload (asset info, routes, script file id, boundary type manifests)
//! lives in [`NodeKind`]; behavior that differs per variant is matched on
//! that enum rather than spread over a class hierarchy.

mod asset;
mod routing;

pub use asset::AssetInfo;
pub use routing::Route;

use crate::enums::{DataType, NodeType, ParamType};
use crate::error::DesignError;
use crate::param::{Params, find_prompt_params};
use ahash::AHashSet;
use serde_json::Value;

/// Function name whose prompts undergo `{{variable}}` expansion.
pub const TEXT_GENERATION: &str = "text-generation";

/// Variant payload of a node.
#[derive(Debug)]
pub enum NodeKind {
    /// Pipeline entry point. `data_types` is the inferred manifest of
    /// payload kinds this input carries; `data` optionally points at an
    /// already-uploaded payload.
    Input {
        data_types: Vec<DataType>,
        data: Option<String>,
    },
    /// Pipeline exit point, with its own inferred manifest.
    Output { data_types: Vec<DataType> },
    /// A platform asset (model, utility, segmentor, reconstructor or
    /// metric), auto-populated from its resolved function spec.
    Asset(AssetInfo),
    /// A user-supplied script, referenced by its uploaded file id.
    Script { file_id: String },
    /// Routes its input to different nodes based on the route table.
    Router { routes: Vec<Route> },
    /// Router specialization that forwards a payload picked by an
    /// upstream comparison.
    Decision { routes: Vec<Route> },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Input { .. } => NodeType::Input,
            NodeKind::Output { .. } => NodeType::Output,
            NodeKind::Asset(_) => NodeType::Asset,
            NodeKind::Script { .. } => NodeType::Script,
            NodeKind::Router { .. } => NodeType::Router,
            NodeKind::Decision { .. } => NodeType::Decision,
        }
    }

    /// Whether this node can produce pipeline output (the asset/script
    /// family). Structural validation requires at least one such node.
    pub fn is_outputable(&self) -> bool {
        matches!(self, NodeKind::Asset(_) | NodeKind::Script { .. })
    }
}

/// A typed vertex of the pipeline graph.
///
/// Nodes are built detached and handed to a [`Pipeline`](crate::Pipeline)
/// via `add_node` (or implicitly via `link`), which assigns the stable
/// `number` and a default label. Topology is immutable once attached;
/// only param values and inferred data types change afterwards.
#[derive(Debug)]
pub struct Node {
    pub(crate) number: Option<u32>,
    pub(crate) label: Option<String>,
    pub(crate) kind: NodeKind,
    pub(crate) inputs: Params,
    pub(crate) outputs: Params,
}

impl Node {
    fn bare(kind: NodeKind) -> Self {
        let tag = kind.node_type().as_str();
        Self {
            number: None,
            label: None,
            inputs: Params::new(ParamType::Input, tag),
            outputs: Params::new(ParamType::Output, tag),
            kind,
        }
    }

    /// Creates an input node with its single `input` output param.
    pub fn input() -> Self {
        let mut node = Self::bare(NodeKind::Input {
            data_types: Vec::new(),
            data: None,
        });
        node.outputs
            .create_param("input", None, false)
            .expect("fresh collection");
        node
    }

    /// Creates an input node that carries a reference to an uploaded
    /// payload.
    pub fn input_with_data(data: impl Into<String>) -> Self {
        let mut node = Self::input();
        if let NodeKind::Input { data: slot, .. } = &mut node.kind {
            *slot = Some(data.into());
        }
        node
    }

    /// Creates an output node with its single `output` input param.
    pub fn output() -> Self {
        let mut node = Self::bare(NodeKind::Output {
            data_types: Vec::new(),
        });
        node.inputs
            .create_param("output", None, false)
            .expect("fresh collection");
        node
    }

    /// Creates a script node from an already-uploaded file id. Params are
    /// declared by the caller via the param collections.
    pub fn script(file_id: impl Into<String>) -> Self {
        Self::bare(NodeKind::Script {
            file_id: file_id.into(),
        })
    }

    /// Creates a script node by uploading a local file through the
    /// uploader collaborator first.
    pub fn script_from_file(
        uploader: &dyn crate::resolver::ScriptUploader,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, DesignError> {
        let uploaded = uploader.upload(path.as_ref())?;
        Ok(Self::script(uploaded.file_id))
    }

    /// Presets the node number used at attach time. Attaching fails if
    /// another node already holds this number.
    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    /// Presets the label; otherwise attach derives `"{TYPE}(ID={number})"`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.inputs.set_owner(&label);
        self.outputs.set_owner(&label);
        self.label = Some(label);
        self
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn inputs(&self) -> &Params {
        &self.inputs
    }

    pub fn inputs_mut(&mut self) -> &mut Params {
        &mut self.inputs
    }

    pub fn outputs(&self) -> &Params {
        &self.outputs
    }

    pub fn outputs_mut(&mut self) -> &mut Params {
        &mut self.outputs
    }

    /// Label if set, otherwise the bare type tag. Used in error messages.
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.node_type().as_str().to_string(),
        }
    }

    /// The inferred data-type manifest, for input and output nodes.
    pub fn data_types(&self) -> Option<&[DataType]> {
        match &self.kind {
            NodeKind::Input { data_types, .. } | NodeKind::Output { data_types } => {
                Some(data_types)
            }
            _ => None,
        }
    }

    /// Appends to the boundary-node manifest; no-op for other kinds or if
    /// the type is already recorded.
    pub(crate) fn push_data_type(&mut self, data_type: &DataType) {
        if let NodeKind::Input { data_types, .. } | NodeKind::Output { data_types } =
            &mut self.kind
            && !data_types.contains(data_type)
        {
            data_types.push(data_type.clone());
        }
    }

    /// Sets an input param's literal value.
    ///
    /// On a text-generation asset node, assigning a string to `prompt`
    /// additionally expands `{{name}}` placeholders into required text
    /// input params. Placeholders whose params pre-exist from the function
    /// spec are left alone; re-assigning a prompt that names a param
    /// created by an earlier expansion fails with a duplicate-param error,
    /// so re-expansion never happens silently.
    pub fn set_input(&mut self, code: &str, value: Value) -> Result<(), DesignError> {
        let node_name = self.display_name();
        if !self.inputs.contains(code) {
            return Err(DesignError::UnknownInputParam {
                code: code.to_string(),
                node: node_name,
            });
        }

        if code == "prompt"
            && let Some(prompt) = value.as_str()
            && let NodeKind::Asset(info) = &mut self.kind
            && info.function == TEXT_GENERATION
        {
            // Resolve every placeholder before creating anything, so a
            // rejected re-expansion leaves the node untouched.
            let mut pending = Vec::new();
            let mut seen = AHashSet::new();
            for name in find_prompt_params(prompt) {
                if !seen.insert(name.clone()) {
                    continue;
                }
                if self.inputs.contains(&name) {
                    if info.expanded.contains(&name) {
                        return Err(DesignError::DuplicateParam {
                            code: name,
                            node: node_name,
                        });
                    }
                    continue;
                }
                pending.push(name);
            }
            for name in pending {
                self.inputs
                    .create_param(&name, Some(DataType::Text), true)?;
                info.expanded.push(name);
            }
        }

        self.inputs
            .get_mut(code)
            .expect("checked above")
            .set_value(value);
        Ok(())
    }

    /// Assigns number and label at attach time and keeps the param
    /// collections' owner tag in sync.
    pub(crate) fn assign_identity(&mut self, number: u32) {
        self.number = Some(number);
        let label = self
            .label
            .take()
            .unwrap_or_else(|| format!("{}(ID={})", self.node_type(), number));
        self.inputs.set_owner(&label);
        self.outputs.set_owner(&label);
        self.label = Some(label);
    }
}
