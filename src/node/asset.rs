//! Asset-node construction: resolving a platform asset and populating the
//! node's params from its function spec.

use super::{Node, NodeKind};
use crate::enums::{AssetType, DataType, FunctionType};
use crate::error::DesignError;
use crate::resolver::{AssetResolver, ResolvedAsset};
use tracing::debug;

/// Provenance and typing info copied from a resolved asset.
#[derive(Debug)]
pub struct AssetInfo {
    pub asset_id: String,
    pub function: String,
    pub supplier: String,
    pub version: String,
    pub asset_type: AssetType,
    pub function_type: FunctionType,
    /// Param codes created by prompt-variable expansion, kept so a second
    /// expansion of the same name fails instead of silently re-running.
    pub(crate) expanded: Vec<String>,
}

impl Node {
    /// Creates an asset node for a model asset, auto-populating inputs
    /// and outputs from the resolved function spec.
    pub fn asset(resolver: &dyn AssetResolver, asset_id: &str) -> Result<Self, DesignError> {
        Self::asset_node(resolver, asset_id, None, FunctionType::Ai)
    }

    /// Like [`asset`](Self::asset), but fails unless the asset resolves
    /// to the declared function.
    pub fn asset_expecting(
        resolver: &dyn AssetResolver,
        asset_id: &str,
        function: &str,
    ) -> Result<Self, DesignError> {
        Self::asset_node(resolver, asset_id, Some(function), FunctionType::Ai)
    }

    /// Creates an asset node for a utility asset. Utility functions take
    /// their input params from the asset's own parameter list rather than
    /// the function spec.
    pub fn utility(resolver: &dyn AssetResolver, asset_id: &str) -> Result<Self, DesignError> {
        Self::asset_node(resolver, asset_id, None, FunctionType::Utility)
    }

    /// Creates a segmentor asset node. Segmentors additionally expose an
    /// `audio` output carrying the segmented stream.
    pub fn segmentor(resolver: &dyn AssetResolver, asset_id: &str) -> Result<Self, DesignError> {
        let mut node = Self::asset_node(resolver, asset_id, None, FunctionType::Segmentor)?;
        node.outputs
            .create_param("audio", Some(DataType::Audio), false)?;
        Ok(node)
    }

    /// Creates a reconstructor asset node, which re-joins the outputs of
    /// segmented lines of execution.
    pub fn reconstructor(
        resolver: &dyn AssetResolver,
        asset_id: &str,
    ) -> Result<Self, DesignError> {
        Self::asset_node(resolver, asset_id, None, FunctionType::Reconstructor)
    }

    /// Creates a metric asset node.
    pub fn metric(resolver: &dyn AssetResolver, asset_id: &str) -> Result<Self, DesignError> {
        Self::asset_node(resolver, asset_id, None, FunctionType::Metric)
    }

    fn asset_node(
        resolver: &dyn AssetResolver,
        asset_id: &str,
        declared_function: Option<&str>,
        function_type: FunctionType,
    ) -> Result<Self, DesignError> {
        let resolved = resolver.resolve(asset_id)?;
        if let Some(declared) = declared_function
            && resolved.function != declared
        {
            return Err(DesignError::FunctionMismatch {
                asset_id: asset_id.to_string(),
                declared: declared.to_string(),
                resolved: resolved.function,
            });
        }
        debug!(
            asset_id,
            function = %resolved.function,
            supplier = %resolved.supplier,
            "resolved asset"
        );

        let mut node = Self::bare(NodeKind::Asset(AssetInfo {
            asset_id: resolved.id.clone(),
            function: resolved.function.clone(),
            supplier: resolved.supplier.clone(),
            version: resolved.version.clone(),
            asset_type: AssetType::Model,
            function_type,
            expanded: Vec::new(),
        }));
        node.populate_from_spec(&resolved, function_type)?;
        Ok(node)
    }

    fn populate_from_spec(
        &mut self,
        resolved: &ResolvedAsset,
        function_type: FunctionType,
    ) -> Result<(), DesignError> {
        let input_specs = if function_type == FunctionType::Utility {
            &resolved.asset_params
        } else {
            &resolved.input_params
        };
        for spec in input_specs {
            self.inputs
                .create_param(&spec.code, spec.data_type.clone(), spec.required)?;
        }
        for spec in &resolved.output_params {
            self.outputs
                .create_param(&spec.code, spec.data_type.clone(), spec.required)?;
        }
        // Asset-supplied defaults land on matching inputs; anything else
        // in the defaults map is ignored.
        for (code, value) in &resolved.defaults {
            if let Some(param) = self.inputs.get_mut(code) {
                param.set_value(value.clone());
            }
        }
        Ok(())
    }

    /// Asset provenance info, for asset-family nodes.
    pub fn asset_info(&self) -> Option<&AssetInfo> {
        match &self.kind {
            NodeKind::Asset(info) => Some(info),
            _ => None,
        }
    }
}
