//! HTTP surface for the hierarchical tool registry.
//!
//! [`ToolService`] routes discovery (`GET /tools`), invocation
//! (`POST /invoke`) and health (`GET /health`) requests onto a frozen
//! [`mcp_tools::ToolRegistry`]; [`ToolServer`] owns the listener and its
//! graceful shutdown.

#![warn(missing_docs, clippy::pedantic)]

pub mod error;
pub mod server;
pub mod service;
pub mod wire;

pub use error::{ServerError, ServerResult};
pub use server::{RunningServer, ToolServer};
pub use service::{
    DEFAULT_MAX_BODY_BYTES, HEALTH_ROUTE, INVOKE_ROUTE, TOOLS_ROUTE, ToolService, status_for,
};
pub use wire::{ErrorResponse, InvokeRequest, InvokeResponse};
