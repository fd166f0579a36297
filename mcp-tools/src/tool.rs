//! The tool capability surface and its two shapes: leaves and composites.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use mcp_primitives::{ParamSpec, ParamType, ParameterSchema, ToolName};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ToolError, ToolResult};

/// Name of the selector parameter every composite declares.
pub const OPERATION_PARAM: &str = "operation";

/// Caller-supplied invocation parameters.
pub type Params = Map<String, Value>;

/// Named children of a tool, sorted by name.
pub type ToolChildren = BTreeMap<String, Arc<dyn Tool>>;

static NO_CHILDREN: ToolChildren = BTreeMap::new();

/// Capability surface shared by every addressable tool.
///
/// Implementations must ignore parameters they do not declare: composites
/// forward their full parameter map, selector included, to the chosen child.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier, unique among siblings.
    fn name(&self) -> &str;

    /// Human-readable summary used for discovery.
    fn description(&self) -> &str;

    /// Parameters accepted by [`Tool::execute`].
    fn parameters(&self) -> &ParameterSchema;

    /// Sub-tools addressable below this tool. Empty for leaves.
    fn children(&self) -> &ToolChildren {
        &NO_CHILDREN
    }

    /// Optional discovery category.
    fn category(&self) -> Option<&str> {
        None
    }

    /// Optional discovery tags.
    fn tags(&self) -> &[String] {
        &[]
    }

    /// Performs the tool's work, or dispatches to a child for composites.
    async fn execute(&self, params: &Params) -> ToolResult<String>;
}

impl fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name())
            .field("children", &self.children().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Leaf tool backed by an async closure.
pub struct FnTool<F> {
    name: ToolName,
    description: String,
    parameters: ParameterSchema,
    handler: F,
}

impl<F> fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

impl<F, Fut> FnTool<F>
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult<String>> + Send + 'static,
{
    /// Wraps `handler` as a leaf tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidDefinition`] if `name` is not a valid tool
    /// name.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: ParameterSchema,
        handler: F,
    ) -> ToolResult<Self> {
        Ok(Self {
            name: ToolName::new(name)?,
            description: description.into(),
            parameters,
            handler,
        })
    }
}

#[async_trait]
impl<F, Fut> Tool for FnTool<F>
where
    F: Fn(Params) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult<String>> + Send + 'static,
{
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    async fn execute(&self, params: &Params) -> ToolResult<String> {
        (self.handler)(params.clone()).await
    }
}

/// Tool that owns named sub-tools and forwards execution to one of them.
///
/// The child set is fixed once [`CompositeToolBuilder::build`] returns.
pub struct CompositeTool {
    name: ToolName,
    description: String,
    parameters: ParameterSchema,
    children: ToolChildren,
    category: Option<String>,
    tags: Vec<String>,
}

impl fmt::Debug for CompositeTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeTool")
            .field("name", &self.name)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

impl CompositeTool {
    /// Starts building a composite tool.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidDefinition`] if `name` is not a valid tool
    /// name.
    pub fn builder(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> ToolResult<CompositeToolBuilder> {
        let mut parameters = ParameterSchema::new();
        parameters.insert(
            OPERATION_PARAM,
            ParamSpec::required(ParamType::String)
                .with_description("Name of the sub-tool to execute"),
        );

        Ok(CompositeToolBuilder {
            name: ToolName::new(name)?,
            description: description.into(),
            parameters,
            children: BTreeMap::new(),
            category: None,
            tags: Vec::new(),
        })
    }
}

#[async_trait]
impl Tool for CompositeTool {
    fn name(&self) -> &str {
        self.name.as_str()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    fn children(&self) -> &ToolChildren {
        &self.children
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    async fn execute(&self, params: &Params) -> ToolResult<String> {
        let operation = params
            .get(OPERATION_PARAM)
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::MissingOperation {
                tool: self.name.to_string(),
            })?;

        let child = self
            .children
            .get(operation)
            .ok_or_else(|| ToolError::UnknownOperation {
                tool: self.name.to_string(),
                operation: operation.to_owned(),
            })?;

        debug!(tool = %self.name, operation, "dispatching composite operation");
        child.execute(params).await
    }
}

/// Builder for [`CompositeTool`].
#[derive(Debug)]
pub struct CompositeToolBuilder {
    name: ToolName,
    description: String,
    parameters: ParameterSchema,
    children: ToolChildren,
    category: Option<String>,
    tags: Vec<String>,
}

impl CompositeToolBuilder {
    /// Adds a child tool addressable by its own name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidDefinition`] if the child's name is invalid
    /// or [`ToolError::DuplicateTool`] if a sibling already uses it.
    pub fn child<T>(self, tool: T) -> ToolResult<Self>
    where
        T: Tool + 'static,
    {
        self.shared_child(Arc::new(tool))
    }

    /// Adds an already shared child tool.
    ///
    /// # Errors
    ///
    /// Same as [`CompositeToolBuilder::child`].
    pub fn shared_child(mut self, tool: Arc<dyn Tool>) -> ToolResult<Self> {
        let name = ToolName::new(tool.name())?;
        if self.children.contains_key(name.as_str()) {
            return Err(ToolError::DuplicateTool {
                parent: self.name.to_string(),
                name: name.into(),
            });
        }
        self.children.insert(name.into(), tool);
        Ok(self)
    }

    /// Declares an additional parameter shared by every operation.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidDefinition`] when redeclaring `operation`.
    pub fn param(mut self, name: impl Into<String>, spec: ParamSpec) -> ToolResult<Self> {
        let name = name.into();
        if name == OPERATION_PARAM {
            return Err(mcp_primitives::Error::InvalidParameter {
                name,
                reason: "the operation selector is reserved".into(),
            }
            .into());
        }
        self.parameters.insert(name, spec);
        Ok(self)
    }

    /// Sets the discovery category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Adds a discovery tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Finalises the composite; its children can no longer change.
    #[must_use]
    pub fn build(self) -> CompositeTool {
        CompositeTool {
            name: self.name,
            description: self.description,
            parameters: self.parameters,
            children: self.children,
            category: self.category,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn echo(name: &'static str) -> impl Tool + 'static {
        FnTool::new(name, "Echo parameters", ParameterSchema::new(), |params: Params| async move {
            serde_json::to_string(&params).map_err(|err| ToolError::execution(err.to_string()))
        })
        .unwrap()
    }

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn composite() -> CompositeTool {
        CompositeTool::builder("Group", "Group of echo tools")
            .and_then(|b| b.child(echo("Echo")))
            .and_then(|b| b.child(echo("Mirror")))
            .map(CompositeToolBuilder::build)
            .unwrap()
    }

    #[tokio::test]
    async fn forwards_identical_parameters_to_child() {
        let tool = composite();
        let input = params(json!({ "operation": "Echo", "query": "acme corp", "count": 3 }));

        let output = tool.execute(&input).await.unwrap();
        let received: Params = serde_json::from_str(&output).unwrap();
        assert_eq!(received, input);
    }

    #[tokio::test]
    async fn missing_or_non_string_operation_errors() {
        let tool = composite();

        let err = tool.execute(&params(json!({ "query": "x" }))).await.unwrap_err();
        assert!(matches!(err, ToolError::MissingOperation { tool } if tool == "Group"));

        let err = tool
            .execute(&params(json!({ "operation": 7 })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingOperation { .. }));
    }

    #[tokio::test]
    async fn operation_matching_is_case_sensitive() {
        let tool = composite();
        let err = tool
            .execute(&params(json!({ "operation": "echo" })))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ToolError::UnknownOperation { tool, operation } if tool == "Group" && operation == "echo"
        ));
    }

    #[test]
    fn composite_declares_required_operation() {
        let tool = composite();
        let spec = tool.parameters().get(OPERATION_PARAM).unwrap();
        assert!(spec.is_required());
        assert_eq!(spec.kind(), ParamType::String);
        assert_eq!(tool.children().len(), 2);
    }

    #[test]
    fn leaves_have_no_children() {
        assert!(echo("Echo").children().is_empty());
    }

    #[test]
    fn duplicate_child_is_rejected() {
        let err = CompositeTool::builder("Group", "dup")
            .and_then(|b| b.child(echo("Echo")))
            .and_then(|b| b.child(echo("Echo")))
            .unwrap_err();

        assert!(matches!(err, ToolError::DuplicateTool { parent, name } if parent == "Group" && name == "Echo"));
    }

    #[test]
    fn operation_parameter_is_reserved() {
        let err = CompositeTool::builder("Group", "reserved")
            .and_then(|b| b.param(OPERATION_PARAM, ParamSpec::optional(ParamType::Int)))
            .unwrap_err();

        assert!(matches!(err, ToolError::InvalidDefinition { .. }));
    }

    #[test]
    fn builder_debug_lists_children() {
        let builder = CompositeTool::builder("Group", "debug")
            .and_then(|b| b.child(echo("Echo")))
            .unwrap();

        let rendered = format!("{builder:?}");
        assert!(rendered.contains("Group"));
        assert!(rendered.contains("Echo"));
    }
}
