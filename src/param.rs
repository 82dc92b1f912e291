//! Params and the ordered, name-addressable collections that hold them.

use crate::enums::{DataType, ParamType};
use crate::error::DesignError;
use crate::pipeline::LinkId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Matches `{{name}}` placeholders in prompt strings. Non-greedy, so the
/// capture never spans two placeholders; nested braces are not supported.
static PROMPT_VAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(.+?)\}\}").unwrap());

/// Extracts prompt-variable names from a prompt string, in order of
/// appearance and without deduplication.
pub fn find_prompt_params(prompt: &str) -> Vec<String> {
    PROMPT_VAR_RE
        .captures_iter(prompt)
        .map(|c| c[1].to_string())
        .collect()
}

/// A single named input or output slot on a node.
///
/// The `data_type` starts out as whatever the function spec (or caller)
/// declared and may be filled in later by type inference; the inference
/// pass never overwrites a type that is already set.
#[derive(Debug, Clone)]
pub struct Param {
    code: String,
    param_type: ParamType,
    data_type: Option<DataType>,
    value: Option<Value>,
    is_required: bool,
    link: Option<LinkId>,
}

impl Param {
    fn new(
        code: impl Into<String>,
        param_type: ParamType,
        data_type: Option<DataType>,
        is_required: bool,
    ) -> Self {
        Self {
            code: code.into(),
            param_type,
            data_type,
            value: None,
            is_required,
            link: None,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    pub fn data_type(&self) -> Option<&DataType> {
        self.data_type.as_ref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.is_required
    }

    /// The link this param participates in, if any. For input params this
    /// is the single inbound edge; for output params the most recent
    /// outbound edge (outputs may fan out).
    pub fn link(&self) -> Option<LinkId> {
        self.link
    }

    /// A param counts as set once it carries a non-null literal value.
    pub fn is_set(&self) -> bool {
        matches!(self.value, Some(ref v) if !v.is_null())
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub(crate) fn set_data_type(&mut self, data_type: DataType) {
        self.data_type = Some(data_type);
    }

    pub(crate) fn set_required(&mut self, is_required: bool) {
        self.is_required = is_required;
    }

    pub(crate) fn set_link(&mut self, link: LinkId) {
        self.link = Some(link);
    }
}

/// Ordered collection of one direction's params on one node.
///
/// Lookup is a linear scan by `code`; collections stay small (single
/// digits to low dozens per node), and insertion order is the
/// serialization order.
#[derive(Debug, Clone)]
pub struct Params {
    direction: ParamType,
    owner: String,
    params: Vec<Param>,
}

impl Params {
    pub(crate) fn new(direction: ParamType, owner: impl Into<String>) -> Self {
        Self {
            direction,
            owner: owner.into(),
            params: Vec::new(),
        }
    }

    /// Creates a new param attached to this collection. Fails if a param
    /// with the same code already exists.
    pub fn create_param(
        &mut self,
        code: &str,
        data_type: Option<DataType>,
        is_required: bool,
    ) -> Result<&mut Param, DesignError> {
        if self.contains(code) {
            return Err(DesignError::DuplicateParam {
                code: code.to_string(),
                node: self.owner.clone(),
            });
        }
        self.params
            .push(Param::new(code, self.direction, data_type, is_required));
        let index = self.params.len() - 1;
        Ok(&mut self.params[index])
    }

    /// Like [`create_param`](Self::create_param), with an initial literal
    /// value.
    pub fn create_param_with_value(
        &mut self,
        code: &str,
        data_type: Option<DataType>,
        value: Value,
        is_required: bool,
    ) -> Result<&mut Param, DesignError> {
        let param = self.create_param(code, data_type, is_required)?;
        param.set_value(value);
        Ok(param)
    }

    pub fn direction(&self) -> ParamType {
        self.direction
    }

    pub fn contains(&self, code: &str) -> bool {
        self.params.iter().any(|p| p.code == code)
    }

    pub fn get(&self, code: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.code == code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut Param> {
        self.params.iter_mut().find(|p| p.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Kept in sync with the owning node's label so error messages can
    /// name the node.
    pub(crate) fn set_owner(&mut self, owner: &str) {
        self.owner = owner.to_string();
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter()
    }
}
