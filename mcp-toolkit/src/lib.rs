//! Hierarchical tool server SDK facade.
//!
//! Bundles the workspace crates behind feature flags so downstream users can
//! pull in only the registry, or the full HTTP server with its built-in
//! tools.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use mcp_primitives as primitives;

/// Tool trait, composites, and the frozen registry (enabled by `tools` feature).
#[cfg(feature = "tools")]
pub use mcp_tools as tools;

/// Brave Search and Yahoo Finance tools (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use mcp_adapters as adapters;

/// HTTP discovery and invocation surface (enabled by `kernel` feature).
#[cfg(feature = "kernel")]
pub use mcp_kernel as kernel;

/// Configuration management (enabled by `config` feature).
#[cfg(feature = "config")]
pub use mcp_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use mcp_telemetry as telemetry;
