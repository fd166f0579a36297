//! Built-in composite tools and their registration.

use mcp_tools::{CompositeTool, RegistryBuilder};
use tracing::info;

use crate::brave::{BraveConfig, BraveSearchTool};
use crate::error::AdapterResult;
use crate::yahoo::{YahooConfig, YahooStockPriceTool};

/// Name of the web tools composite.
pub const WEB_TOOLS: &str = "WebTools";
/// Name of the finance tools composite.
pub const FINANCE_TOOLS: &str = "FinanceTools";

/// Builds the `WebTools` composite exposing `BraveSearch`.
///
/// # Errors
///
/// Returns [`crate::AdapterError::Definition`] if a tool cannot be defined.
pub fn web_tools(brave: BraveConfig) -> AdapterResult<CompositeTool> {
    Ok(
        CompositeTool::builder(WEB_TOOLS, "A collection of web-related tools")?
            .child(BraveSearchTool::new(brave)?)?
            .category("web")
            .build(),
    )
}

/// Builds the `FinanceTools` composite exposing `YahooStockPrice`.
///
/// # Errors
///
/// Returns [`crate::AdapterError::Definition`] if a tool cannot be defined.
pub fn finance_tools(yahoo: YahooConfig) -> AdapterResult<CompositeTool> {
    Ok(
        CompositeTool::builder(FINANCE_TOOLS, "A collection of financial tools")?
            .child(YahooStockPriceTool::new(yahoo)?)?
            .category("finance")
            .build(),
    )
}

/// Registers every built-in composite with `registry`.
///
/// # Errors
///
/// Returns [`crate::AdapterError::Definition`] if a tool cannot be defined
/// or registered.
pub fn register_builtin_tools(
    registry: &mut RegistryBuilder,
    brave: BraveConfig,
    yahoo: YahooConfig,
) -> AdapterResult<()> {
    registry.register(web_tools(brave)?)?;
    registry.register(finance_tools(yahoo)?)?;
    info!(tools = ?[WEB_TOOLS, FINANCE_TOOLS], "registered built-in tools");
    Ok(())
}
