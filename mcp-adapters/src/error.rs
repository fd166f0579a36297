//! Error type shared by the API-backed tools.

use mcp_tools::ToolError;
use thiserror::Error;

/// Result alias used by adapters.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by adapter implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The caller's parameters cannot be turned into an upstream request.
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be built.
        reason: String,
    },

    /// Transport-level failures (network, timeout, etc.).
    #[error("transport error: {reason}")]
    Transport {
        /// Additional context about the error.
        reason: String,
    },

    /// The upstream API returned an error status or a malformed body.
    #[error("response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },

    /// A tool or parameter schema could not be defined.
    #[error(transparent)]
    Definition {
        /// Underlying tool definition failure.
        #[from]
        source: ToolError,
    },
}

impl AdapterError {
    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for transport failures.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for response failures.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

impl From<mcp_primitives::Error> for AdapterError {
    fn from(source: mcp_primitives::Error) -> Self {
        Self::Definition {
            source: source.into(),
        }
    }
}

impl From<AdapterError> for ToolError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Definition { source } => source,
            other => ToolError::execution(other.to_string()),
        }
    }
}
