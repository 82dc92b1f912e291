//! The pipeline graph container: node/link registries, identity
//! assignment, linking with per-edge type inference, validation passes
//! and serialization into the canonical request document.

use crate::document::{LinkDoc, ParamMappingDoc, PipelineDoc};
use crate::enums::{NodeType, Operation, RouteType};
use crate::error::{DesignError, ValidationError};
use crate::link::{Link, edge_mismatch, infer_edge};
use crate::node::{Node, NodeKind, Route, TEXT_GENERATION};
use crate::param::{Param, find_prompt_params};
use crate::resolver::{AssetResolver, ScriptUploader};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Stable numeric identity of a node within one pipeline. This is the
/// node's `number`, not a positional index: explicitly numbered nodes
/// keep their number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a link in its pipeline's registry (links are append-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(pub u32);

/// Something that can stand for a node endpoint when linking: either the
/// id of an already-attached node, or an owned detached [`Node`], which
/// gets attached to the pipeline as a documented side effect of
/// [`Pipeline::link`] (observable via [`Pipeline::node_count`]).
pub trait Endpoint {
    fn resolve(self, pipeline: &mut Pipeline) -> Result<NodeId, DesignError>;
}

impl Endpoint for NodeId {
    fn resolve(self, pipeline: &mut Pipeline) -> Result<NodeId, DesignError> {
        if pipeline.position(self).is_none() {
            return Err(DesignError::UnknownNode { number: self.0 });
        }
        Ok(self)
    }
}

impl Endpoint for Node {
    fn resolve(self, pipeline: &mut Pipeline) -> Result<NodeId, DesignError> {
        pipeline.add_node(self)
    }
}

/// The whole graph for one design session.
///
/// Construction, inference and validation are pure in-memory operations;
/// nothing here blocks, retries or touches shared state. A pipeline is
/// not designed for concurrent mutation.
#[derive(Debug, Default)]
pub struct Pipeline {
    nodes: Vec<Node>,
    links: Vec<Link>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- node registry -------------------------------------------------

    /// Attaches a node, assigning the next free number (or keeping a
    /// preset one) and defaulting the label to `"{TYPE}(ID={number})"`.
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, DesignError> {
        let number = node.number().unwrap_or(self.nodes.len() as u32);
        if self.nodes.iter().any(|n| n.number() == Some(number)) {
            return Err(DesignError::NodeNumberTaken { number });
        }
        node.assign_identity(number);
        debug!(number, label = node.label().unwrap_or_default(), "attached node");
        self.nodes.push(node);
        Ok(NodeId(number))
    }

    pub fn add_nodes(
        &mut self,
        nodes: impl IntoIterator<Item = Node>,
    ) -> Result<Vec<NodeId>, DesignError> {
        nodes.into_iter().map(|node| self.add_node(node)).collect()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.number() == Some(id.0))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.number() == Some(id.0))
    }

    /// Lookup by raw node number.
    pub fn get_node(&self, number: u32) -> Option<&Node> {
        self.node(NodeId(number))
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.number() == Some(id.0))
    }

    // ---- shortcut constructors -----------------------------------------

    pub fn input(&mut self) -> Result<NodeId, DesignError> {
        self.add_node(Node::input())
    }

    pub fn input_with_data(&mut self, data: impl Into<String>) -> Result<NodeId, DesignError> {
        self.add_node(Node::input_with_data(data))
    }

    pub fn output(&mut self) -> Result<NodeId, DesignError> {
        self.add_node(Node::output())
    }

    pub fn asset(
        &mut self,
        resolver: &dyn AssetResolver,
        asset_id: &str,
    ) -> Result<NodeId, DesignError> {
        let node = Node::asset(resolver, asset_id)?;
        self.add_node(node)
    }

    pub fn asset_expecting(
        &mut self,
        resolver: &dyn AssetResolver,
        asset_id: &str,
        function: &str,
    ) -> Result<NodeId, DesignError> {
        let node = Node::asset_expecting(resolver, asset_id, function)?;
        self.add_node(node)
    }

    pub fn utility(
        &mut self,
        resolver: &dyn AssetResolver,
        asset_id: &str,
    ) -> Result<NodeId, DesignError> {
        let node = Node::utility(resolver, asset_id)?;
        self.add_node(node)
    }

    pub fn segmentor(
        &mut self,
        resolver: &dyn AssetResolver,
        asset_id: &str,
    ) -> Result<NodeId, DesignError> {
        let node = Node::segmentor(resolver, asset_id)?;
        self.add_node(node)
    }

    pub fn reconstructor(
        &mut self,
        resolver: &dyn AssetResolver,
        asset_id: &str,
    ) -> Result<NodeId, DesignError> {
        let node = Node::reconstructor(resolver, asset_id)?;
        self.add_node(node)
    }

    pub fn metric(
        &mut self,
        resolver: &dyn AssetResolver,
        asset_id: &str,
    ) -> Result<NodeId, DesignError> {
        let node = Node::metric(resolver, asset_id)?;
        self.add_node(node)
    }

    pub fn script(&mut self, file_id: impl Into<String>) -> Result<NodeId, DesignError> {
        self.add_node(Node::script(file_id))
    }

    pub fn script_from_file(
        &mut self,
        uploader: &dyn ScriptUploader,
        path: impl AsRef<std::path::Path>,
    ) -> Result<NodeId, DesignError> {
        let node = Node::script_from_file(uploader, path)?;
        self.add_node(node)
    }

    pub fn router(&mut self, routes: Vec<Route>) -> Result<NodeId, DesignError> {
        self.add_node(Node::router(routes))
    }

    pub fn decision(&mut self, routes: Vec<Route>) -> Result<NodeId, DesignError> {
        self.add_node(Node::decision(routes))
    }

    // ---- linking -------------------------------------------------------

    /// Links `from`'s output param to `to`'s input param.
    ///
    /// Detached [`Node`] endpoints are attached to this pipeline first.
    /// The edge is type-inferred immediately (§ the lenient propagation
    /// rule); an input param accepts at most one inbound link. Linking a
    /// decision node's `data` output requires its `passthrough` input to
    /// be linked already, and records the passthrough feeder's number as
    /// the edge's provenance.
    pub fn link<F, T>(
        &mut self,
        from: F,
        from_param: &str,
        to: T,
        to_param: &str,
    ) -> Result<LinkId, DesignError>
    where
        F: Endpoint,
        T: Endpoint,
    {
        let from_id = from.resolve(self)?;
        let to_id = to.resolve(self)?;
        let fi = self
            .position(from_id)
            .ok_or(DesignError::UnknownNode { number: from_id.0 })?;
        let ti = self
            .position(to_id)
            .ok_or(DesignError::UnknownNode { number: to_id.0 })?;

        if !self.nodes[fi].outputs().contains(from_param) {
            return Err(DesignError::UnknownOutputParam {
                code: from_param.to_string(),
                node: self.nodes[fi].display_name(),
            });
        }
        if !self.nodes[ti].inputs().contains(to_param) {
            return Err(DesignError::UnknownInputParam {
                code: to_param.to_string(),
                node: self.nodes[ti].display_name(),
            });
        }
        if self.nodes[ti]
            .inputs()
            .get(to_param)
            .is_some_and(|p| p.link().is_some())
        {
            return Err(DesignError::ParamAlreadyLinked {
                code: to_param.to_string(),
                node: self.nodes[ti].display_name(),
            });
        }

        let mut link = Link::new(from_id, to_id, from_param, to_param);

        // A decision's payload type is only knowable by tracing which
        // upstream node supplied the value being passed through.
        if matches!(self.nodes[fi].kind(), NodeKind::Decision { .. }) && from_param == "data" {
            let feeder = self
                .links
                .iter()
                .find(|l| l.to == from_id && l.to_param == "passthrough")
                .map(|l| l.from)
                .ok_or_else(|| DesignError::PassthroughNotLinked {
                    node: self.nodes[fi].display_name(),
                })?;
            let passthrough_type = self.nodes[fi]
                .inputs()
                .get("passthrough")
                .and_then(|p| p.data_type().cloned());
            if let Some(data_type) = passthrough_type
                && let Some(data) = self.nodes[fi].outputs_mut().get_mut("data")
            {
                data.set_data_type(data_type);
            }
            link.data_source_id = Some(feeder);
        }

        let link_id = LinkId(self.links.len() as u32);
        let (from_p, to_p) = self.param_pair(fi, ti, from_param, to_param);
        let resolved = infer_edge(from_p, to_p);
        from_p.set_link(link_id);
        to_p.set_link(link_id);
        if let Some(data_type) = resolved {
            self.nodes[fi].push_data_type(&data_type);
            self.nodes[ti].push_data_type(&data_type);
        }

        debug!(
            from = %from_id,
            to = %to_id,
            from_param,
            to_param,
            "linked params"
        );
        self.links.push(link);
        Ok(link_id)
    }

    /// Mutable access to an edge's two endpoint params, handling the
    /// self-loop case where both live on the same node.
    fn param_pair(
        &mut self,
        fi: usize,
        ti: usize,
        from_param: &str,
        to_param: &str,
    ) -> (&mut Param, &mut Param) {
        if fi == ti {
            let node = &mut self.nodes[fi];
            let from_p = node.outputs.get_mut(from_param).expect("checked");
            // Outputs and inputs are disjoint collections on the node.
            let inputs = &mut node.inputs;
            let to_p = inputs.get_mut(to_param).expect("checked");
            (from_p, to_p)
        } else if fi < ti {
            let (left, right) = self.nodes.split_at_mut(ti);
            (
                left[fi].outputs.get_mut(from_param).expect("checked"),
                right[0].inputs.get_mut(to_param).expect("checked"),
            )
        } else {
            let (left, right) = self.nodes.split_at_mut(fi);
            (
                right[0].outputs.get_mut(from_param).expect("checked"),
                left[ti].inputs.get_mut(to_param).expect("checked"),
            )
        }
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn link_at(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0 as usize)
    }

    /// First link between an ordered node pair, if any.
    pub fn get_link(&self, from: NodeId, to: NodeId) -> Option<&Link> {
        self.links.iter().find(|l| l.from == from && l.to == to)
    }

    // ---- convenience graph builders ------------------------------------

    /// Creates an output node and links `node`'s `from_param` into it.
    pub fn use_output(&mut self, node: NodeId, from_param: &str) -> Result<NodeId, DesignError> {
        let output = self.output()?;
        self.link(node, from_param, output, "output")?;
        Ok(output)
    }

    /// Builds a router in front of `targets`: one `checkType`/`equal`
    /// route per target (keyed by the target input param's data type),
    /// with `source`'s `source_param` feeding the router.
    pub fn route(
        &mut self,
        source: NodeId,
        source_param: &str,
        targets: &[(NodeId, &str)],
    ) -> Result<NodeId, DesignError> {
        let mut routes = Vec::with_capacity(targets.len());
        for (target, to_param) in targets {
            let node = self
                .node(*target)
                .ok_or(DesignError::UnknownNode { number: target.0 })?;
            let param =
                node.inputs()
                    .get(to_param)
                    .ok_or_else(|| DesignError::UnknownInputParam {
                        code: to_param.to_string(),
                        node: node.display_name(),
                    })?;
            let value = match param.data_type() {
                Some(data_type) => Value::String(data_type.as_str().to_string()),
                None => Value::Null,
            };
            routes.push(Route::new(
                value,
                vec![*target],
                Operation::Equal,
                RouteType::CheckType,
            ));
        }
        let router = self.router(routes)?;
        self.link(source, source_param, router, "input")?;
        for (target, to_param) in targets {
            self.link(router, "input", *target, *to_param)?;
        }
        Ok(router)
    }

    // ---- inference -----------------------------------------------------

    /// Re-runs the per-edge propagation rule over every link in
    /// declaration order. Each edge's rule is local and idempotent, so
    /// repeated runs converge to the same fixed point.
    pub fn auto_infer(&mut self) {
        for i in 0..self.links.len() {
            let link = self.links[i].clone();
            let (Some(fi), Some(ti)) = (self.position(link.from), self.position(link.to)) else {
                continue; // dangling ends are reported by validation
            };
            if self.nodes[fi].outputs().get(&link.from_param).is_none()
                || self.nodes[ti].inputs().get(&link.to_param).is_none()
            {
                continue;
            }
            let (from_p, to_p) = self.param_pair(fi, ti, &link.from_param, &link.to_param);
            let resolved = infer_edge(from_p, to_p);
            if let Some(data_type) = resolved {
                self.nodes[fi].push_data_type(&data_type);
                self.nodes[ti].push_data_type(&data_type);
            }
        }
        debug!(links = self.links.len(), "auto-inference pass complete");
    }

    // ---- validation ----------------------------------------------------

    /// Structural pass: input nodes must be linked out, output nodes
    /// linked in, every other node both; and the pipeline needs at least
    /// one input, one output and one asset/script-family node.
    ///
    /// Boundary nodes are checked before interior ones so that a dangling
    /// output is reported as such, not as its unlinked upstream neighbor.
    pub fn validate_nodes(&self) -> Result<(), ValidationError> {
        let linked_from: AHashSet<NodeId> = self.links.iter().map(|l| l.from).collect();
        let linked_to: AHashSet<NodeId> = self.links.iter().map(|l| l.to).collect();

        let mut contains_input = false;
        let mut contains_output = false;
        let mut contains_outputable = false;

        for node in &self.nodes {
            let id = NodeId(node.number().expect("attached"));
            match node.node_type() {
                NodeType::Input => {
                    contains_input = true;
                    if !linked_from.contains(&id) {
                        return Err(ValidationError::InputNotLinkedOut {
                            label: node.display_name(),
                        });
                    }
                }
                NodeType::Output => {
                    contains_output = true;
                    if !linked_to.contains(&id) {
                        return Err(ValidationError::OutputNotLinkedIn {
                            label: node.display_name(),
                        });
                    }
                }
                _ => contains_outputable |= node.kind().is_outputable(),
            }
        }

        for node in &self.nodes {
            if matches!(node.node_type(), NodeType::Input | NodeType::Output) {
                continue;
            }
            let id = NodeId(node.number().expect("attached"));
            if !linked_to.contains(&id) {
                return Err(ValidationError::NotLinkedIn {
                    label: node.display_name(),
                });
            }
            if !linked_from.contains(&id) {
                return Err(ValidationError::NotLinkedOut {
                    label: node.display_name(),
                });
            }
        }

        if !contains_input || !contains_output || !contains_outputable {
            return Err(ValidationError::MissingBoundaryNodes);
        }
        Ok(())
    }

    fn is_param_linked(&self, node: NodeId, code: &str) -> bool {
        self.links
            .iter()
            .any(|l| l.to == node && l.to_param == code)
    }

    /// A required param is satisfied by a literal value or an inbound
    /// link.
    pub fn is_param_set(&self, node: NodeId, param: &Param) -> bool {
        param.is_set() || self.is_param_linked(node, param.code())
    }

    /// Parameter pass: every required input must be set or linked;
    /// text-generation prompts supersede free text and must have all
    /// their placeholders satisfied.
    pub fn validate_params(&mut self) -> Result<(), ValidationError> {
        for i in 0..self.nodes.len() {
            let is_text_generation = matches!(
                self.nodes[i].kind(),
                NodeKind::Asset(info) if info.function == TEXT_GENERATION
            );
            if is_text_generation {
                self.special_prompt_validation(i)?;
            }
        }

        for node in &self.nodes {
            let id = NodeId(node.number().expect("attached"));
            for param in node.inputs() {
                if param.is_required() && !self.is_param_set(id, param) {
                    return Err(ValidationError::RequiredParamUnset {
                        code: param.code().to_string(),
                        label: node.display_name(),
                    });
                }
            }
        }
        Ok(())
    }

    /// When a text-generation node's `prompt` is set, the `text` input is
    /// no longer required, but every `{{name}}` placeholder in the prompt
    /// must name an input param that is itself set or linked.
    fn special_prompt_validation(&mut self, index: usize) -> Result<(), ValidationError> {
        let (id, label, prompt_value, prompt_satisfied) = {
            let node = &self.nodes[index];
            let id = NodeId(node.number().expect("attached"));
            let Some(prompt) = node.inputs().get("prompt") else {
                return Ok(());
            };
            (
                id,
                node.display_name(),
                prompt.value().and_then(|v| v.as_str()).map(str::to_string),
                self.is_param_set(id, prompt),
            )
        };
        if !prompt_satisfied {
            return Ok(());
        }

        if let Some(text) = self.nodes[index].inputs_mut().get_mut("text") {
            text.set_required(false);
        }

        let Some(prompt) = prompt_value else {
            return Ok(()); // linked prompts are expanded server-side
        };
        for name in find_prompt_params(&prompt) {
            let node = &self.nodes[index];
            let satisfied = node
                .inputs()
                .get(&name)
                .is_some_and(|param| self.is_param_set(id, param));
            if !satisfied {
                return Err(ValidationError::PromptParamUnset {
                    code: name,
                    label: label.clone(),
                });
            }
        }
        Ok(())
    }

    /// Runs both validation passes: structure first, then params.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.validate_nodes()?;
        self.validate_params()
    }

    /// Strict, opt-in typing pass: fails on any link whose endpoints are
    /// both typed but disagree. Never run implicitly.
    pub fn validate_types(&self) -> Result<(), ValidationError> {
        for link in &self.links {
            let (Some(from_node), Some(to_node)) = (self.node(link.from), self.node(link.to))
            else {
                continue;
            };
            let (Some(from_p), Some(to_p)) = (
                from_node.outputs().get(&link.from_param),
                to_node.inputs().get(&link.to_param),
            ) else {
                continue;
            };
            if let Some((from_type, to_type)) = edge_mismatch(from_p, to_p) {
                return Err(ValidationError::TypeMismatch {
                    from_label: from_node.display_name(),
                    from_param: link.from_param.clone(),
                    from_type,
                    to_label: to_node.display_name(),
                    to_param: link.to_param.clone(),
                    to_type,
                });
            }
        }
        Ok(())
    }

    // ---- serialization -------------------------------------------------

    /// Emits the canonical document. Links sharing an ordered `(from,
    /// to)` node pair collapse into one record whose param mappings keep
    /// insertion order, matching the backend's one-edge-per-pair
    /// expectation.
    pub fn serialize(&self) -> PipelineDoc {
        let nodes = self.nodes.iter().map(Node::serialize).collect();

        let mut links: Vec<LinkDoc> = Vec::new();
        let mut by_pair: AHashMap<(NodeId, NodeId), usize> = AHashMap::new();
        for link in &self.links {
            let mapping = ParamMappingDoc {
                from: link.from_param.clone(),
                to: link.to_param.clone(),
                data_source_id: link.data_source_id,
            };
            match by_pair.entry((link.from, link.to)) {
                std::collections::hash_map::Entry::Occupied(entry) => {
                    links[*entry.get()].param_mapping.push(mapping);
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(links.len());
                    links.push(LinkDoc {
                        from: link.from,
                        to: link.to,
                        param_mapping: vec![mapping],
                    });
                }
            }
        }

        debug!(
            nodes = self.nodes.len(),
            links = links.len(),
            "serialized pipeline"
        );
        PipelineDoc { nodes, links }
    }
}
