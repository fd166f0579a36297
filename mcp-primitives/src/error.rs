//! Shared error definitions for tool primitives.

use thiserror::Error;

/// Result alias used by the primitive types.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing primitive types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Tool name failed validation.
    #[error("invalid tool name `{name}`: {reason}")]
    InvalidToolName {
        /// The offending name.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Parameter declaration failed validation.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
}
