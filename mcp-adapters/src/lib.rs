//! API-backed tools exposed by the server.
//!
//! Each module wraps one external service as a leaf [`mcp_tools::Tool`];
//! [`catalog`] groups them into the composites registered at startup.

#![warn(missing_docs, clippy::pedantic)]

pub mod brave;
pub mod catalog;
pub mod error;
pub mod yahoo;

mod http_client;

pub use brave::{BraveConfig, BraveSearchTool};
pub use catalog::{finance_tools, register_builtin_tools, web_tools};
pub use error::{AdapterError, AdapterResult};
pub use yahoo::{YahooConfig, YahooStockPriceTool};
