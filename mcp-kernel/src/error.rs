//! Errors raised while running the HTTP server.

use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors raised while binding or running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested listen address.
        addr: SocketAddr,
        /// Underlying hyper error.
        source: hyper::Error,
    },
    /// The server stopped with an I/O or protocol failure.
    #[error("server error: {0}")]
    Serve(#[from] hyper::Error),
    /// The background server task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
