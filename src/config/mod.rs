//! Configuration management.
//!
//! This module handles:
//! - Environment variable loading
//! - Configuration validation
//! - Default value handling
//! - Bearer token storage via [`SecretString`]
//!
//! # Example
//!
//! ```
//! use promdash::config::{Config, SecretString};
//! use promdash::proxy::TransportKind;
//!
//! // Build a config directly (use Config::from_env() in production)
//! let mut config = Config::new("http://prometheus:9090");
//! config.transport = TransportKind::Direct;
//! config.token = Some(SecretString::new("panel-token"));
//!
//! let debug = format!("{config:?}");
//! assert!(debug.contains("<REDACTED>"));
//! assert!(!debug.contains("panel-token"));
//! ```

mod secret;
mod validation;

pub use secret::SecretString;
pub use validation::{validate_config, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

use crate::error::ConfigError;
use crate::proxy::{TransportKind, DEFAULT_PROXY_FUNCTION, DEFAULT_TIMEOUT_MS};
use crate::range::RangePreset;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Application configuration.
///
/// Use [`Config::from_env`] to load configuration from environment variables.
/// The optional `token` uses [`SecretString`] to prevent accidental logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host panel endpoint (proxy mode) or time-series API base URL (direct mode).
    pub endpoint: String,
    /// Transport used to reach the time-series API.
    pub transport: TransportKind,
    /// Host function that forwards calls in proxy mode.
    pub proxy_function: String,
    /// Optional bearer token.
    pub token: Option<SecretString>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: String,
    /// Transport timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Range preset selected at startup.
    pub default_range: RangePreset,
}

impl Config {
    /// Config for `endpoint` with every other value at its default.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            transport: TransportKind::default(),
            proxy_function: DEFAULT_PROXY_FUNCTION.into(),
            token: None,
            log_level: DEFAULT_LOG_LEVEL.into(),
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            default_range: RangePreset::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `PROMDASH_ENDPOINT`: host panel endpoint or time-series API base URL
    ///
    /// Optional environment variables (with defaults):
    /// - `PROMDASH_TRANSPORT`: `proxy` or `direct` (default: `proxy`)
    /// - `PROMDASH_PROXY_FUNCTION`: host function name (default: `prometheus_proxy`)
    /// - `PROMDASH_TOKEN`: bearer token (default: unset)
    /// - `LOG_LEVEL`: logging level (default: `info`)
    /// - `REQUEST_TIMEOUT_MS`: transport timeout (default: `30000`)
    /// - `DEFAULT_RANGE`: startup range preset (default: `last1h`)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PROMDASH_ENDPOINT` is missing, a value
    /// cannot be parsed, or validation fails (see [`validate_config`]).
    #[must_use = "configuration should be used"]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let endpoint =
            std::env::var("PROMDASH_ENDPOINT").map_err(|_| ConfigError::MissingRequired {
                var: "PROMDASH_ENDPOINT".into(),
            })?;

        let transport = match std::env::var("PROMDASH_TRANSPORT") {
            Ok(val) => val.parse()?,
            Err(_) => TransportKind::default(),
        };

        let proxy_function = std::env::var("PROMDASH_PROXY_FUNCTION")
            .unwrap_or_else(|_| DEFAULT_PROXY_FUNCTION.into());

        let token = std::env::var("PROMDASH_TOKEN").ok().map(SecretString::new);

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into());

        let request_timeout_ms = parse_env_u64("REQUEST_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;

        let default_range = match std::env::var("DEFAULT_RANGE") {
            Ok(val) => val.parse().map_err(|e: crate::error::RangeError| {
                ConfigError::InvalidValue {
                    var: "DEFAULT_RANGE".into(),
                    reason: e.to_string(),
                }
            })?,
            Err(_) => RangePreset::default(),
        };

        let config = Self {
            endpoint,
            transport,
            proxy_function,
            token,
            log_level,
            request_timeout_ms,
            default_range,
        };

        validate_config(&config)?;
        Ok(config)
    }
}

/// Parse an environment variable as u64, using a default if not set.
fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    std::env::var(name).map_or(Ok(default), |val| {
        val.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: name.into(),
            reason: "must be a positive integer".into(),
        })
    })
}
