//! # Pipewright - Declarative AI Pipeline Designer
//!
//! **Pipewright** is a client-side designer for AI processing pipelines:
//! directed graphs of inputs, model assets, scripts, routers and decisions
//! that are assembled declaratively, type-inferred and validated locally,
//! and serialized into the canonical JSON document an execution backend
//! consumes. No HTTP, no sessions - the only external collaborators are an
//! asset resolver and a script uploader, injected behind traits.
//!
//! ## Core Workflow
//!
//! 1.  **Assemble**: Create a [`Pipeline`](pipeline::Pipeline) and attach
//!     nodes - inputs, resolved assets, scripts, routers, decisions. Nodes
//!     get a stable number and a default label at attach time.
//! 2.  **Link**: Connect output params to input params with
//!     [`Pipeline::link`](pipeline::Pipeline::link). Each edge immediately
//!     propagates data types between its endpoints (the lenient rule: a
//!     known type fills an unknown one, conflicts are left alone).
//! 3.  **Validate**: Run [`validate`](pipeline::Pipeline::validate) for the
//!     structural and parameter passes, and optionally the strict
//!     [`validate_types`](pipeline::Pipeline::validate_types) pass.
//! 4.  **Serialize**: [`serialize`](pipeline::Pipeline::serialize) emits
//!     the document, merging parallel links per node pair.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pipewright::prelude::*;
//! use pipewright::resolver::{ParamSpec, ResolvedAsset};
//! use ahash::AHashMap;
//!
//! // An asset resolver backed by whatever catalog you have. Real
//! // implementations live in the transport layer around this crate.
//! struct Catalog;
//!
//! impl AssetResolver for Catalog {
//!     fn resolve(&self, asset_id: &str) -> std::result::Result<ResolvedAsset, ResolveError> {
//!         Ok(ResolvedAsset {
//!             id: asset_id.to_string(),
//!             function: "translation".to_string(),
//!             supplier: "acme".to_string(),
//!             version: "1.0".to_string(),
//!             input_params: vec![ParamSpec::new("text", Some(DataType::Text), true)],
//!             output_params: vec![ParamSpec::new("data", Some(DataType::Text), false)],
//!             asset_params: vec![],
//!             defaults: AHashMap::new(),
//!         })
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let catalog = Catalog;
//!     let mut pipeline = Pipeline::new();
//!
//!     // Assemble: input -> translation model -> output.
//!     let input = pipeline.input()?;
//!     let model = pipeline.asset(&catalog, "64d21cbb6eb563074a698ef1")?;
//!     pipeline.link(input, "input", model, "text")?;
//!     pipeline.use_output(model, "data")?;
//!
//!     // Validate structure and params, then emit the document.
//!     pipeline.validate()?;
//!     let doc = pipeline.serialize();
//!     println!("{}", serde_json::to_string_pretty(&doc)?);
//!
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod enums;
pub mod error;
pub mod link;
pub mod node;
pub mod param;
pub mod pipeline;
pub mod prelude;
pub mod resolver;

pub use pipeline::Pipeline;
