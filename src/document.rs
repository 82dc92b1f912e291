//! The canonical pipeline document emitted towards the backend.
//!
//! These structs mirror the execution service's JSON schema exactly:
//! camelCase keys, explicit `null` for unset param values, variant node
//! fields present only for the kinds that carry them, and one link record
//! per ordered node pair.

use crate::enums::{AssetType, DataType, FunctionType, NodeType};
use crate::node::{Node, NodeKind, Route};
use crate::param::Param;
use crate::pipeline::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level document: the full graph in attach order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDoc {
    pub nodes: Vec<NodeDoc>,
    pub links: Vec<LinkDoc>,
}

/// One serialized node. The variant fields after `output_values` are
/// populated per node kind and omitted everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDoc {
    pub number: Option<u32>,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub input_values: Vec<ParamDoc>,
    pub output_values: Vec<ParamDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Inferred payload manifest, on input and output nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<Vec<DataType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<AssetType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_type: Option<FunctionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<Vec<Route>>,
}

/// One serialized param slot. `value` is emitted as an explicit `null`
/// when unset; the backend distinguishes "declared but empty" from
/// "absent".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDoc {
    pub code: String,
    pub data_type: Option<DataType>,
    pub value: Option<Value>,
}

impl From<&Param> for ParamDoc {
    fn from(param: &Param) -> Self {
        Self {
            code: param.code().to_string(),
            data_type: param.data_type().cloned(),
            value: param.value().cloned(),
        }
    }
}

/// One serialized edge record between an ordered node pair. Every param
/// pair linked between the two nodes appears in `param_mapping`, in the
/// order the links were declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDoc {
    pub from: NodeId,
    pub to: NodeId,
    pub param_mapping: Vec<ParamMappingDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamMappingDoc {
    pub from: String,
    pub to: String,
    /// Provenance of decision `data` edges: the number of the node that
    /// fed the decision's passthrough.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source_id: Option<NodeId>,
}

impl Node {
    /// Serializes this node into its document form.
    pub fn serialize(&self) -> NodeDoc {
        let mut doc = NodeDoc {
            number: self.number(),
            label: self.label().map(str::to_string),
            node_type: self.node_type(),
            input_values: self.inputs().iter().map(ParamDoc::from).collect(),
            output_values: self.outputs().iter().map(ParamDoc::from).collect(),
            data: None,
            data_type: None,
            asset_id: None,
            function: None,
            supplier: None,
            version: None,
            asset_type: None,
            function_type: None,
            file_id: None,
            routes: None,
        };
        match self.kind() {
            NodeKind::Input { data_types, data } => {
                doc.data = data.clone();
                doc.data_type = Some(data_types.clone());
            }
            NodeKind::Output { data_types } => {
                doc.data_type = Some(data_types.clone());
            }
            NodeKind::Asset(info) => {
                doc.asset_id = Some(info.asset_id.clone());
                doc.function = Some(info.function.clone());
                doc.supplier = Some(info.supplier.clone());
                doc.version = Some(info.version.clone());
                doc.asset_type = Some(info.asset_type);
                doc.function_type = Some(info.function_type);
            }
            NodeKind::Script { file_id } => {
                doc.file_id = Some(file_id.clone());
            }
            NodeKind::Router { routes } | NodeKind::Decision { routes } => {
                doc.routes = Some(routes.clone());
            }
        }
        doc
    }
}
