//! Prelude module for convenient imports
//!
//! Re-exports the types needed for the common design workflow: build a
//! [`Pipeline`], attach and link nodes, validate, serialize. Import this
//! module to get access to the core functionality without having to
//! import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use pipewright::prelude::*;
//! # use pipewright::resolver::{AssetResolver, ResolvedAsset};
//! # use pipewright::error::ResolveError;
//! # struct Catalog;
//! # impl AssetResolver for Catalog {
//! #     fn resolve(&self, id: &str) -> std::result::Result<ResolvedAsset, ResolveError> {
//! #         Err(ResolveError::AssetNotFound(id.to_string()))
//! #     }
//! # }
//!
//! # fn run_example() -> Result<()> {
//! let catalog = Catalog;
//! let mut pipeline = Pipeline::new();
//!
//! let input = pipeline.input()?;
//! let model = pipeline.asset(&catalog, "64d21cbb6eb563074a698ef1")?;
//! pipeline.link(input, "input", model, "text")?;
//! let _output = pipeline.use_output(model, "data")?;
//!
//! pipeline.validate()?;
//! let doc = pipeline.serialize();
//! println!("{}", serde_json::to_string_pretty(&doc)?);
//! # Ok(())
//! # }
//! ```

// Graph assembly
pub use crate::pipeline::{LinkId, NodeId, Pipeline};

// Nodes and params
pub use crate::node::{Node, NodeKind, Route};
pub use crate::param::{Param, Params};

// Wire-level enums
pub use crate::enums::{DataType, NodeType, Operation, RouteType};

// Collaborator seams
pub use crate::resolver::{AssetResolver, ScriptUploader};

// Serialized document
pub use crate::document::PipelineDoc;

// Error types
pub use crate::error::{DesignError, ResolveError, ValidationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
