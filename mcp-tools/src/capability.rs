//! Discovery descriptors projected from the tool tree.

use mcp_primitives::ParameterSchema;
use serde::{Deserialize, Serialize};

use crate::tool::Tool;

/// Serializable description of a tool and its sub-tools.
///
/// Descriptors are detached copies: changing one never affects the tool it
/// was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCapability {
    /// Tool name.
    pub name: String,
    /// Human-readable summary.
    pub description: String,
    /// Accepted parameters.
    pub parameters: ParameterSchema,
    /// Descriptors of the tool's children, sorted by name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtools: Vec<ToolCapability>,
    /// Optional discovery category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Optional discovery tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ToolCapability {
    /// Builds the descriptor for `tool` and, recursively, all of its children.
    #[must_use]
    pub fn from_tool(tool: &dyn Tool) -> Self {
        let subtools = tool
            .children()
            .values()
            .map(|child| Self::from_tool(child.as_ref()))
            .collect();

        Self {
            name: tool.name().to_owned(),
            description: tool.description().to_owned(),
            parameters: tool.parameters().clone(),
            subtools,
            category: tool.category().map(str::to_owned),
            tags: tool.tags().to_vec(),
        }
    }

    /// Finds a direct sub-tool descriptor by name.
    #[must_use]
    pub fn subtool(&self, name: &str) -> Option<&ToolCapability> {
        self.subtools.iter().find(|sub| sub.name == name)
    }
}

/// Discovery payload listing every top-level tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitiesResponse {
    /// Top-level tool descriptors, sorted by name.
    pub tools: Vec<ToolCapability>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use mcp_primitives::{ParamSpec, ParamType};
    use serde_json::json;

    use crate::error::ToolError;
    use crate::tool::{CompositeTool, CompositeToolBuilder, FnTool, OPERATION_PARAM, Params};

    fn leaf(name: &'static str) -> impl Tool + 'static {
        let mut schema = ParameterSchema::new();
        schema.insert("query", ParamSpec::required(ParamType::String));
        FnTool::new(name, "leaf", schema, |_: Params| async {
            Ok::<_, ToolError>(String::new())
        })
        .unwrap()
    }

    fn nested() -> CompositeTool {
        let inner = CompositeTool::builder("Inner", "inner group")
            .and_then(|b| b.child(leaf("Deep")))
            .map(CompositeToolBuilder::build)
            .unwrap();

        CompositeTool::builder("Outer", "outer group")
            .and_then(|b| b.child(leaf("Beta")))
            .and_then(|b| b.child(leaf("Alpha")))
            .and_then(|b| b.child(inner))
            .map(|b| b.category("test").tag("nested"))
            .map(CompositeToolBuilder::build)
            .unwrap()
    }

    #[test]
    fn one_descriptor_per_child_sorted_by_name() {
        let tool = nested();
        let capability = ToolCapability::from_tool(&tool);

        let names: Vec<_> = capability.subtools.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Inner"]);
        assert_eq!(capability.category.as_deref(), Some("test"));
        assert_eq!(capability.tags, ["nested"]);

        let inner = capability.subtool("Inner").unwrap();
        assert_eq!(inner.subtools.len(), 1);
        assert!(inner.subtool("Deep").unwrap().subtools.is_empty());
    }

    #[test]
    fn mutating_descriptor_leaves_tool_untouched() {
        let tool = nested();
        let mut capability = ToolCapability::from_tool(&tool);

        capability.parameters.remove(OPERATION_PARAM);
        capability.parameters.insert("extra", ParamSpec::optional(ParamType::Bool));
        capability.subtools[0].parameters.remove("query");

        assert!(tool.parameters().contains(OPERATION_PARAM));
        assert!(!tool.parameters().contains("extra"));
        assert!(tool.children()["Alpha"].parameters().contains("query"));
        assert_eq!(ToolCapability::from_tool(&tool), ToolCapability::from_tool(&tool));
    }

    #[test]
    fn leaf_serializes_without_optional_fields() {
        let capability = ToolCapability::from_tool(&leaf("Solo"));
        let value = serde_json::to_value(&capability).unwrap();

        assert_eq!(
            value,
            json!({
                "name": "Solo",
                "description": "leaf",
                "parameters": { "query": { "type": "string", "required": true } },
            })
        );
    }
}
