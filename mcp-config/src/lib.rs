//! Configuration management for the tool server.
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file, and are validated before the server starts.

#![warn(missing_docs, clippy::pedantic)]

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Environment variable holding the Brave Search subscription token.
pub const BRAVE_API_KEY_VAR: &str = "BRAVE_API_KEY";
/// Environment variable overriding the listen address.
pub const BIND_ADDR_VAR: &str = "MCP_BIND_ADDR";
/// Environment variable overriding the upstream HTTP timeout in seconds.
pub const HTTP_TIMEOUT_VAR: &str = "MCP_HTTP_TIMEOUT_SECS";
/// Environment variable overriding the log filter.
pub const LOG_VAR: &str = "MCP_LOG";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LOG_FILTER: &str = "info";

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory environment variable is unset or empty.
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),
    /// An environment variable could not be parsed.
    #[error("invalid value `{value}` for {name}: {reason}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Human-readable reason for rejection.
        reason: String,
    },
    /// The assembled configuration is inconsistent.
    #[error("invalid server configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Runtime settings for the tool server.
#[derive(Clone)]
pub struct ServerConfig {
    bind_addr: SocketAddr,
    brave_api_key: String,
    http_timeout: Duration,
    log_filter: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("bind_addr", &self.bind_addr)
            .field("brave_api_key", &"<redacted>")
            .field("http_timeout", &self.http_timeout)
            .field("log_filter", &self.log_filter)
            .finish()
    }
}

impl ServerConfig {
    /// Creates a configuration with default settings and the given API key.
    #[must_use]
    pub fn new(brave_api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            brave_api_key: brave_api_key.into(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] when `BRAVE_API_KEY` is unset and
    /// [`ConfigError::InvalidVar`] when an override cannot be parsed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_key = get(BRAVE_API_KEY_VAR).ok_or(ConfigError::MissingVar(BRAVE_API_KEY_VAR))?;
        let mut config = Self::new(api_key);

        let bind = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        config.bind_addr = bind.trim().parse().map_err(|err| ConfigError::InvalidVar {
            name: BIND_ADDR_VAR,
            value: bind.clone(),
            reason: format!("{err}"),
        })?;

        if let Some(raw) = get(HTTP_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|err| ConfigError::InvalidVar {
                name: HTTP_TIMEOUT_VAR,
                value: raw.clone(),
                reason: format!("{err}"),
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Some(filter) = get(LOG_VAR) {
            config.log_filter = filter;
        }

        config.validate()?;
        debug!(?config, "loaded server configuration");
        Ok(config)
    }

    /// Overrides the listen address.
    #[must_use]
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    /// Overrides the upstream HTTP timeout.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Overrides the log filter directive.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Returns the listen address.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Returns the Brave Search subscription token.
    #[must_use]
    pub fn brave_api_key(&self) -> &str {
        &self.brave_api_key
    }

    /// Returns the upstream HTTP timeout.
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        self.http_timeout
    }

    /// Returns the log filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] when the API key is blank, the
    /// timeout is zero, or the log filter is empty.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.brave_api_key.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("Brave API key cannot be empty"));
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "HTTP timeout must be greater than zero",
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidConfig("log filter cannot be empty"));
        }
        Ok(())
    }
}

/// Loads variables from a `.env` file in the working directory or its
/// parents, if one exists. Variables already set in the environment win.
///
/// Returns the path of the file that was loaded.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
