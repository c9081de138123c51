//! Error types for the dashboard query engine.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`ProxyError`]: Failures of a single proxied backend call
//! - [`CatalogError`]: Metric catalog refresh failures
//! - [`RangeError`]: Time range parsing errors
//! - [`ConfigError`]: Configuration errors
//!
//! All errors implement `Send + Sync` for async compatibility.
//!
//! Only [`ProxyError::Transport`] and friends are ever surfaced to the
//! dashboard layer as "real" failures. Parse failures mean "no data" and
//! catalog failures are logged and swallowed.

use thiserror::Error;

/// Top-level application error.
///
/// Wraps all subsystem errors for unified handling in the binary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Proxy call error.
    #[error("Proxy error: {0}")]
    Proxy(#[from] ProxyError),

    /// Catalog error.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Time range error.
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors of a single logical proxy call.
///
/// The HTTP-like status codes follow the host proxy: connection failures
/// are reported as 500 and undecodable bodies as 400.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// The destination answered with a non-success status.
    #[error("Transport error ({status}): {message}")]
    Transport {
        /// HTTP-like status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },

    /// The call did not complete in time.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The destination could not be reached.
    #[error("Connection error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// A payload was received but could not be decoded.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the decoding failure.
        message: String,
    },

    /// The logical request could not be built.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of what's invalid.
        message: String,
    },
}

impl ProxyError {
    /// HTTP-like status code for this failure.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Timeout { .. } => 504,
            Self::Network { .. } => 500,
            Self::Parse { .. } | Self::InvalidRequest { .. } => 400,
        }
    }

    /// Returns true if callers should treat this failure as "no data".
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Metric catalog errors.
///
/// These never leave [`crate::catalog::MetricCatalog::refresh`]; they are
/// logged and the catalog keeps its previous contents.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The discovery call failed.
    #[error("Catalog refresh failed: {message}")]
    RefreshFailed {
        /// Description of the failure.
        message: String,
    },

    /// The catalog lock was poisoned by a panicking writer.
    #[error("Catalog lock poisoned")]
    LockPoisoned,
}

impl From<ProxyError> for CatalogError {
    fn from(err: ProxyError) -> Self {
        Self::RefreshFailed {
            message: err.to_string(),
        }
    }
}

/// Time range parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Unknown preset name.
    #[error("Unknown range preset: {value}")]
    InvalidPreset {
        /// The rejected value.
        value: String,
    },

    /// A custom bound could not be parsed as a timestamp.
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp {
        /// The rejected value.
        value: String,
    },
}

/// Configuration errors.
///
/// These errors represent failures in configuration loading and validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
