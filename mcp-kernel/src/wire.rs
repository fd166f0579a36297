//! Wire-level structures exchanged over the HTTP surface.

use mcp_tools::{Params, ToolError};
use serde::{Deserialize, Serialize};

/// Body of a `POST /invoke` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeRequest {
    /// Top-level tool name or dotted path, e.g. `WebTools.BraveSearch`.
    pub tool: String,
    /// Parameters forwarded unchanged to the resolved tool.
    #[serde(default)]
    pub parameters: Params,
}

/// Successful invocation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeResponse {
    /// Output produced by the tool.
    pub result: String,
}

/// Error payload returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message.
    pub error: String,
    /// Stable machine readable error code.
    pub code: String,
}

impl ErrorResponse {
    /// Creates an error payload.
    #[must_use]
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

impl From<&ToolError> for ErrorResponse {
    fn from(err: &ToolError) -> Self {
        Self::new(err.to_string(), err.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn parameters_default_to_empty() {
        let request: InvokeRequest = serde_json::from_value(json!({ "tool": "WebTools" })).unwrap();
        assert_eq!(request.tool, "WebTools");
        assert!(request.parameters.is_empty());
    }

    #[test]
    fn tool_errors_carry_their_code() {
        let err = ToolError::ToolNotFound {
            name: "GhostTools".into(),
        };
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "tool_not_found");
        assert!(body.error.contains("GhostTools"));
    }
}
