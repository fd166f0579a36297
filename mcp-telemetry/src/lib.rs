//! Observability utilities for the tool server.

#![warn(missing_docs, clippy::pedantic)]

use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;

/// Errors raised while installing the tracing subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The filter directive could not be parsed.
    #[error("invalid log filter `{filter}`: {source}")]
    InvalidFilter {
        /// Directive that failed to parse.
        filter: String,
        /// Parser error.
        source: ParseError,
    },
    /// A global subscriber was already installed.
    #[error("tracing subscriber already initialised")]
    AlreadyInitialised,
}

/// Parses a filter directive such as `info` or `debug,hyper=warn`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if `directive` does not parse.
pub fn parse_filter(directive: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(directive).map_err(|source| TelemetryError::InvalidFilter {
        filter: directive.to_owned(),
        source,
    })
}

/// Builds the filter used by [`init_tracing`].
///
/// `RUST_LOG` takes precedence when set; otherwise `fallback` is used.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] if `RUST_LOG` is unset and
/// `fallback` is not a valid directive.
pub fn env_filter(fallback: &str) -> Result<EnvFilter, TelemetryError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => parse_filter(fallback),
    }
}

/// Installs a global `fmt` subscriber.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a bad directive and
/// [`TelemetryError::AlreadyInitialised`] when called twice.
pub fn init_tracing(fallback: &str) -> Result<(), TelemetryError> {
    let filter = env_filter(fallback)?;
    let directive = filter.to_string();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|_| TelemetryError::AlreadyInitialised)?;
    debug!(filter = %directive, "tracing subscriber installed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_directive() {
        let err = parse_filter("mcp_kernel=notalevel").unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::InvalidFilter { filter, .. } if filter == "mcp_kernel=notalevel"
        ));
    }

    #[test]
    fn accepts_directives() {
        assert!(parse_filter("debug,hyper=warn").is_ok());
        assert!(env_filter("info").is_ok());
    }

    #[test]
    fn second_initialisation_is_rejected() {
        let _ = init_tracing("info");
        assert!(matches!(
            init_tracing("info"),
            Err(TelemetryError::AlreadyInitialised)
        ));
    }
}
