//! Hierarchical tool registry and dispatch.
//!
//! Tools are either leaves that perform work or composites that forward to a
//! named child. Top-level tools live in a [`ToolRegistry`] that is frozen
//! before serving begins; callers address any node of the tree with a dotted
//! path such as `WebTools.BraveSearch`, and discovery projects the whole tree
//! into [`ToolCapability`] descriptors.

#![warn(missing_docs, clippy::pedantic)]

pub mod capability;
pub mod error;
pub mod params;
pub mod path;
pub mod registry;
pub mod tool;

pub use capability::{CapabilitiesResponse, ToolCapability};
pub use error::{ToolError, ToolResult};
pub use params::{lenient_optional, parse_params};
pub use path::ToolPath;
pub use registry::{RegistryBuilder, ToolRegistry};
pub use tool::{
    CompositeTool, CompositeToolBuilder, FnTool, OPERATION_PARAM, Params, Tool, ToolChildren,
};
