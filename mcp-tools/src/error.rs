//! Errors produced by tool registration, resolution, and invocation.

use thiserror::Error;

/// Result alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors produced by tool registration, resolution, and invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool or parameter definition failed validation.
    #[error("invalid tool definition: {source}")]
    InvalidDefinition {
        /// Underlying validation failure.
        #[from]
        source: mcp_primitives::Error,
    },

    /// Two children of the same composite share a name.
    #[error("tool `{name}` is already registered under `{parent}`")]
    DuplicateTool {
        /// Composite that rejected the child.
        parent: String,
        /// Name of the offending child.
        name: String,
    },

    /// The dotted path was empty or contained an empty segment.
    #[error("invalid tool path `{path}`")]
    InvalidPath {
        /// Path as supplied by the caller.
        path: String,
    },

    /// The first path segment is not a registered top-level tool.
    #[error("tool `{name}` not found")]
    ToolNotFound {
        /// Missing top-level name.
        name: String,
    },

    /// A later path segment is not a child of the tool reached so far.
    #[error("sub-tool `{segment}` not found while resolving `{path}`")]
    SubToolNotFound {
        /// Full path as supplied by the caller.
        path: String,
        /// Segment that failed to match.
        segment: String,
    },

    /// A composite was executed without a string `operation` parameter.
    #[error("operation must be a string naming a sub-tool of `{tool}`")]
    MissingOperation {
        /// Composite that was executed.
        tool: String,
    },

    /// The `operation` parameter does not name a child of the composite.
    #[error("operation `{operation}` not found in `{tool}`")]
    UnknownOperation {
        /// Composite that was executed.
        tool: String,
        /// Operation value supplied by the caller.
        operation: String,
    },

    /// A leaf tool's own logic failed.
    #[error("tool execution failed: {reason}")]
    Execution {
        /// Message reported by the tool implementation.
        reason: String,
    },
}

impl ToolError {
    /// Creates an execution error from the supplied reason.
    #[must_use]
    pub fn execution(reason: impl Into<String>) -> Self {
        Self::Execution {
            reason: reason.into(),
        }
    }

    /// Machine readable code identifying the error kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidDefinition { .. } => "invalid_definition",
            Self::DuplicateTool { .. } => "duplicate_tool",
            Self::InvalidPath { .. } => "invalid_path",
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::SubToolNotFound { .. } => "sub_tool_not_found",
            Self::MissingOperation { .. } => "missing_operation",
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::Execution { .. } => "execution_failed",
        }
    }

    /// Returns `true` for failures raised while walking a dotted path.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. } | Self::ToolNotFound { .. } | Self::SubToolNotFound { .. }
        )
    }
}
