//! Configuration validation.
//!
//! Ensures loaded values are usable before any transport is built.

use super::Config;
use crate::error::ConfigError;

/// Minimum allowed timeout in milliseconds (1 second).
pub const MIN_TIMEOUT_MS: u64 = 1000;

/// Maximum allowed timeout in milliseconds (5 minutes).
pub const MAX_TIMEOUT_MS: u64 = 300_000;

/// Validate configuration values.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] if:
/// - `PROMDASH_ENDPOINT` is not an absolute `http`/`https` URL
/// - `PROMDASH_PROXY_FUNCTION` is empty
/// - `PROMDASH_TOKEN` is set but blank
/// - `REQUEST_TIMEOUT_MS` is outside 1000-300000
#[must_use = "validation result should be checked"]
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let endpoint = config.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            var: "PROMDASH_ENDPOINT".into(),
            reason: "must be an http:// or https:// URL".into(),
        });
    }

    if config.proxy_function.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "PROMDASH_PROXY_FUNCTION".into(),
            reason: "must not be empty".into(),
        });
    }

    if config.token.as_ref().is_some_and(super::SecretString::is_blank) {
        return Err(ConfigError::InvalidValue {
            var: "PROMDASH_TOKEN".into(),
            reason: "must not be blank when set".into(),
        });
    }

    if config.request_timeout_ms < MIN_TIMEOUT_MS || config.request_timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::InvalidValue {
            var: "REQUEST_TIMEOUT_MS".into(),
            reason: format!("must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms"),
        });
    }

    Ok(())
}
