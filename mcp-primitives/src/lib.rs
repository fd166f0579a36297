//! Core shared types for the hierarchical tool server.

#![warn(missing_docs, clippy::pedantic)]

mod error;
mod name;
mod schema;

/// Error type and result alias shared by the primitives.
pub use error::{Error, Result};
/// Validated tool names and the dotted-path delimiter.
pub use name::{PATH_DELIMITER, ToolName};
/// Parameter schema declarations.
pub use schema::{ParamSpec, ParamType, ParameterSchema, ParameterSchemaBuilder};
