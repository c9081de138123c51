//! Logical proxy request types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProxyError;

/// Instant query endpoint.
pub const QUERY_PATH: &str = "api/v1/query";
/// Range query endpoint.
pub const QUERY_RANGE_PATH: &str = "api/v1/query_range";

/// Label value discovery endpoint for `label`.
#[must_use]
pub fn label_values_path(label: &str) -> String {
    format!("api/v1/label/{label}/values")
}

/// Request parameters: a flat mapping of names to JSON primitives.
pub type Params = Map<String, Value>;

/// HTTP method of a logical proxy call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`: parameters travel as a query string.
    #[default]
    Get,
    /// `POST`: parameters travel as a JSON body.
    Post,
}

impl HttpMethod {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ProxyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(ProxyError::InvalidRequest {
                message: format!("Unsupported method: {other}"),
            }),
        }
    }
}

/// A single logical call as handed to a [`crate::traits::ProxyTransport`].
///
/// `params` is the JSON document form of the parameter mapping; the host
/// proxy receives it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRequest {
    /// Backend-relative operation path, e.g. `api/v1/query`.
    pub path: String,
    /// Parameters serialized as a JSON object.
    pub params: String,
    /// HTTP method the backend call uses.
    pub method: HttpMethod,
}

impl ProxyRequest {
    /// Build a request, serializing `params`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidRequest`] if the path is empty or a
    /// parameter value is an array or object.
    pub fn new(
        path: impl Into<String>,
        params: &Params,
        method: HttpMethod,
    ) -> Result<Self, ProxyError> {
        let path = path.into();
        if path.trim().is_empty() {
            return Err(ProxyError::InvalidRequest {
                message: "Path must not be empty".into(),
            });
        }

        if let Some((name, _)) = params
            .iter()
            .find(|(_, v)| matches!(v, Value::Array(_) | Value::Object(_)))
        {
            return Err(ProxyError::InvalidRequest {
                message: format!("Parameter {name} must be a primitive value"),
            });
        }

        let params = serde_json::to_string(params).map_err(|e| ProxyError::InvalidRequest {
            message: format!("Failed to serialize parameters: {e}"),
        })?;

        Ok(Self {
            path,
            params,
            method,
        })
    }

    /// Decode the parameter document back into a mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidRequest`] if the document is not a JSON object.
    pub fn decoded_params(&self) -> Result<Params, ProxyError> {
        serde_json::from_str(&self.params).map_err(|e| ProxyError::InvalidRequest {
            message: format!("Parameters are not a JSON object: {e}"),
        })
    }

    /// Parameters as query-string pairs.
    ///
    /// Strings are used verbatim, other primitives in their JSON form,
    /// nulls are dropped.
    ///
    /// # Errors
    ///
    /// See [`Self::decoded_params`].
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>, ProxyError> {
        Ok(self
            .decoded_params()?
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::Null => None,
                Value::String(s) => Some((k, s)),
                other => Some((k, other.to_string())),
            })
            .collect())
    }
}
