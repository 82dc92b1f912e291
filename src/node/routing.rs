//! Router and decision nodes plus their route tables.

use super::{Node, NodeKind};
use crate::enums::{DataType, Operation, RouteType};
use crate::pipeline::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry in a router/decision route table: when the routed value
/// matches under `operation`, execution continues along `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub value: Value,
    pub path: Vec<NodeId>,
    pub operation: Operation,
    #[serde(rename = "type")]
    pub route_type: RouteType,
}

impl Route {
    pub fn new(value: Value, path: Vec<NodeId>, operation: Operation, route_type: RouteType) -> Self {
        Self {
            value,
            path,
            operation,
            route_type,
        }
    }

    /// The common case: route by payload data type, exact match.
    pub fn check_type(data_type: &DataType, target: NodeId) -> Self {
        Self::new(
            Value::String(data_type.as_str().to_string()),
            vec![target],
            Operation::Equal,
            RouteType::CheckType,
        )
    }
}

impl Node {
    /// Creates a router node with the given route table. Routers carry a
    /// single `input` slot on each side.
    pub fn router(routes: Vec<Route>) -> Self {
        let mut node = Self::bare(NodeKind::Router { routes });
        node.inputs
            .create_param("input", None, false)
            .expect("fresh collection");
        node.outputs
            .create_param("input", None, false)
            .expect("fresh collection");
        node
    }

    /// Creates a decision node. The `comparison` input receives the value
    /// being decided upon, `passthrough` the payload to forward; the
    /// forwarded payload leaves through the `data` output, whose type and
    /// provenance are inferred from whatever feeds `passthrough`.
    pub fn decision(routes: Vec<Route>) -> Self {
        let mut node = Self::bare(NodeKind::Decision { routes });
        node.inputs
            .create_param("comparison", None, false)
            .expect("fresh collection");
        node.inputs
            .create_param("passthrough", None, false)
            .expect("fresh collection");
        node.outputs
            .create_param("data", None, false)
            .expect("fresh collection");
        node
    }

    /// Route table, for router/decision nodes.
    pub fn routes(&self) -> Option<&[Route]> {
        match &self.kind {
            NodeKind::Router { routes } | NodeKind::Decision { routes } => Some(routes),
            _ => None,
        }
    }
}
