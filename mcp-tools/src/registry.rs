//! Top-level tool registry.
//!
//! Tools are collected into a [`RegistryBuilder`] during startup and then
//! frozen into a [`ToolRegistry`]. The frozen registry has no mutation API, so
//! lookups from concurrent requests need no locking.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use mcp_primitives::ToolName;
use tracing::{debug, warn};

use crate::capability::{CapabilitiesResponse, ToolCapability};
use crate::error::ToolResult;
use crate::path::ToolPath;
use crate::tool::{Params, Tool};

/// Mutable collection of top-level tools used before serving starts.
#[derive(Default)]
pub struct RegistryBuilder {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("registered", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a top-level tool under its own name.
    ///
    /// A tool registered under an existing name replaces the previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ToolError::InvalidDefinition`] if the tool name is not
    /// addressable by a dotted path.
    pub fn register<T>(&mut self, tool: T) -> ToolResult<()>
    where
        T: Tool + 'static,
    {
        self.register_shared(Arc::new(tool))
    }

    /// Registers an already shared top-level tool.
    ///
    /// # Errors
    ///
    /// Same as [`RegistryBuilder::register`].
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) -> ToolResult<()> {
        let name = ToolName::new(tool.name())?;
        if self.tools.insert(name.to_string(), tool).is_some() {
            warn!(tool = %name, "replacing previously registered tool");
        } else {
            debug!(tool = %name, "registered tool");
        }
        Ok(())
    }

    /// Registers a tool, returning the builder for chaining.
    ///
    /// # Errors
    ///
    /// Same as [`RegistryBuilder::register`].
    pub fn with_tool<T>(mut self, tool: T) -> ToolResult<Self>
    where
        T: Tool + 'static,
    {
        self.register(tool)?;
        Ok(self)
    }

    /// Looks up a tool registered so far.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Freezes the builder into a read-only registry.
    #[must_use]
    pub fn freeze(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}

/// Read-only mapping from top-level name to tool.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("registered", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Starts a new registry builder.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Returns the top-level tool registered under `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Names of all top-level tools in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Number of top-level tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` when no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Resolves a dotted path to the addressed tool.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ToolError::InvalidPath`],
    /// [`crate::ToolError::ToolNotFound`] or
    /// [`crate::ToolError::SubToolNotFound`] as described on
    /// [`ToolPath::resolve`].
    pub fn resolve(&self, path: &str) -> ToolResult<Arc<dyn Tool>> {
        ToolPath::parse(path)?.resolve(self)
    }

    /// Resolves `path` and executes the addressed tool with `params`.
    ///
    /// # Errors
    ///
    /// Propagates resolution failures and any error returned by the tool.
    pub async fn invoke(&self, path: &str, params: &Params) -> ToolResult<String> {
        let tool = self.resolve(path)?;
        tool.execute(params).await
    }

    /// Builds a fresh discovery tree covering every top-level tool.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitiesResponse {
        CapabilitiesResponse {
            tools: self
                .tools
                .values()
                .map(|tool| ToolCapability::from_tool(tool.as_ref()))
                .collect(),
        }
    }
}
