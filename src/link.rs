//! Directed edges between params, and the per-edge type-inference rule.

use crate::enums::DataType;
use crate::param::Param;
use crate::pipeline::NodeId;

/// A directed edge carrying data from one node's output param to another
/// node's input param.
///
/// Each link holds exactly one param pair; multiple links between the
/// same ordered node pair are merged into a single record at
/// serialization time. `data_source_id` is a provenance hint recorded for
/// decision `data` edges: the number of the node that fed the decision's
/// `passthrough` input.
#[derive(Debug, Clone)]
pub struct Link {
    pub(crate) from: NodeId,
    pub(crate) to: NodeId,
    pub(crate) from_param: String,
    pub(crate) to_param: String,
    pub(crate) data_source_id: Option<NodeId>,
}

impl Link {
    pub(crate) fn new(
        from: NodeId,
        to: NodeId,
        from_param: impl Into<String>,
        to_param: impl Into<String>,
    ) -> Self {
        Self {
            from,
            to,
            from_param: from_param.into(),
            to_param: to_param.into(),
            data_source_id: None,
        }
    }

    pub fn from_node(&self) -> NodeId {
        self.from
    }

    pub fn to_node(&self) -> NodeId {
        self.to
    }

    pub fn from_param(&self) -> &str {
        &self.from_param
    }

    pub fn to_param(&self) -> &str {
        &self.to_param
    }

    pub fn data_source_id(&self) -> Option<NodeId> {
        self.data_source_id
    }
}

/// The propagation rule for one edge: if exactly one endpoint has a data
/// type, copy it to the other; if both are set they are left alone, even
/// when they disagree. Conflicts only surface in the explicit strict
/// pass. Returns the type the edge resolved to, if any.
pub(crate) fn infer_edge(from_param: &mut Param, to_param: &mut Param) -> Option<DataType> {
    let resolved = from_param
        .data_type()
        .or_else(|| to_param.data_type())
        .cloned();
    if let Some(data_type) = &resolved {
        if from_param.data_type().is_none() {
            from_param.set_data_type(data_type.clone());
        }
        if to_param.data_type().is_none() {
            to_param.set_data_type(data_type.clone());
        }
    }
    resolved
}

/// Strict companion to [`infer_edge`]: reports both endpoint types when
/// they are set and disagree.
pub(crate) fn edge_mismatch(from_param: &Param, to_param: &Param) -> Option<(DataType, DataType)> {
    match (from_param.data_type(), to_param.data_type()) {
        (Some(f), Some(t)) if f != t => Some((f.clone(), t.clone())),
        _ => None,
    }
}
