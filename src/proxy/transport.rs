//! HTTP transports.
//!
//! Two `reqwest`-backed implementations of [`ProxyTransport`]:
//! - [`HostProxyTransport`]: calls the host panel's proxy function, which
//!   forwards the request to the time-series API
//! - [`DirectTransport`]: calls the time-series API itself, doing what the
//!   host proxy function would do

#![allow(clippy::missing_errors_doc)]

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::types::{HttpMethod, ProxyRequest};
use crate::config::{Config, SecretString};
use crate::error::{ConfigError, ProxyError};
use crate::traits::ProxyTransport;

/// Default host function that forwards time-series calls.
pub const DEFAULT_PROXY_FUNCTION: &str = "prometheus_proxy";

/// Default transport timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Which transport the binary talks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Host panel proxy function.
    #[default]
    Proxy,
    /// Time-series API directly.
    Direct,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proxy => f.write_str("proxy"),
            Self::Direct => f.write_str("direct"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy" => Ok(Self::Proxy),
            "direct" => Ok(Self::Direct),
            _ => Err(ConfigError::InvalidValue {
                var: "PROMDASH_TRANSPORT".into(),
                reason: format!("expected 'proxy' or 'direct', got '{s}'"),
            }),
        }
    }
}

fn build_client(timeout_ms: u64) -> Result<Client, ProxyError> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()
        .map_err(|e| ProxyError::Network {
            message: format!("Failed to create HTTP client: {e}"),
        })
}

fn with_token(builder: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token.expose()),
        None => builder,
    }
}

/// Map a send failure to a [`ProxyError`].
fn send_error(e: &reqwest::Error, url: &str, timeout_ms: u64) -> ProxyError {
    if e.is_timeout() {
        tracing::error!(url = %url, timeout_ms, "Proxy transport timed out");
        ProxyError::Timeout { timeout_ms }
    } else {
        tracing::error!(url = %url, error = %e, "Proxy transport failed");
        ProxyError::Network {
            message: e.to_string(),
        }
    }
}

/// Message the host proxy function reports when the backend body is not JSON.
pub const HOST_PARSE_ERROR: &str = "JSON Parse Error";

/// Classify an HTTP response.
///
/// Non-success statuses become [`ProxyError::Transport`] whose message is
/// the body's `message` or `error` field (looked up inside a host
/// `{message: {..}, status}` wrapper first), else the raw body, else the
/// status reason. Success bodies must decode as JSON.
async fn decode_response(response: Response) -> Result<Value, ProxyError> {
    let status = response.status();
    let body = response.text().await.map_err(|e| ProxyError::Network {
        message: format!("Failed to read response body: {e}"),
    })?;

    if !status.is_success() {
        return Err(ProxyError::Transport {
            status: status.as_u16(),
            message: error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
        });
    }

    serde_json::from_str(&body).map_err(|e| ProxyError::Parse {
        message: format!("Response is not valid JSON: {e}"),
    })
}

fn error_message(body: &str) -> Option<String> {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        let wrapped = v.get("message").filter(|m| m.is_object());
        wrapped
            .into_iter()
            .chain(std::iter::once(&v))
            .find_map(|doc| {
                ["message", "error"]
                    .iter()
                    .find_map(|key| doc.get(*key).and_then(Value::as_str))
            })
            .map(str::to_string)
    });
    from_json.or_else(|| {
        let trimmed = body.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Transport that calls the host panel's proxy function.
///
/// The host receives `{lmntargetFunction, path, params, method}` where
/// `params` is the JSON document built by [`ProxyRequest::new`]. The host
/// replies with the backend body wrapped as `{message: <body>, status: <code>}`;
/// this transport strips that wrapper.
#[derive(Debug, Clone)]
pub struct HostProxyTransport {
    client: Client,
    endpoint: String,
    function: String,
    token: Option<SecretString>,
    timeout_ms: u64,
}

impl HostProxyTransport {
    /// Create a transport posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>, timeout_ms: u64) -> Result<Self, ProxyError> {
        Ok(Self {
            client: build_client(timeout_ms)?,
            endpoint: endpoint.into(),
            function: DEFAULT_PROXY_FUNCTION.to_string(),
            token: None,
            timeout_ms,
        })
    }

    /// Use a different host function.
    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Host endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Host function name.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }
}

/// Strip the host's `{message, status}` response wrapper if present.
fn unwrap_host_envelope(payload: Value) -> Value {
    match payload {
        Value::Object(mut map)
            if map.len() == 2
                && map.get("status").is_some_and(Value::is_number)
                && map.get("message").is_some_and(|m| m.is_object() || m.is_array()) =>
        {
            map.remove("message").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl ProxyTransport for HostProxyTransport {
    async fn send(&self, request: ProxyRequest) -> Result<Value, ProxyError> {
        let body = json!({
            "lmntargetFunction": self.function,
            "path": request.path,
            "params": request.params,
            "method": request.method,
        });

        let builder = self.client.post(&self.endpoint).json(&body);
        let response = with_token(builder, self.token.as_ref())
            .send()
            .await
            .map_err(|e| send_error(&e, &self.endpoint, self.timeout_ms))?;

        decode_response(response)
            .await
            .map(unwrap_host_envelope)
            .map_err(host_parse_failure)
    }
}

/// The host answers an undecodable backend body with `400 JSON Parse Error`.
fn host_parse_failure(err: ProxyError) -> ProxyError {
    match err {
        ProxyError::Transport {
            status: 400,
            message,
        } if message == HOST_PARSE_ERROR => {
            tracing::debug!("Host proxy could not decode the backend body");
            ProxyError::Parse { message }
        }
        other => other,
    }
}

/// Transport that calls the time-series API directly.
///
/// `GET` parameters travel as a query string, `POST` parameters as a
/// JSON body.
#[derive(Debug, Clone)]
pub struct DirectTransport {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
    timeout_ms: u64,
}

impl DirectTransport {
    /// Create a transport for the API at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Result<Self, ProxyError> {
        Ok(Self {
            client: build_client(timeout_ms)?,
            base_url: base_url.into(),
            token: None,
            timeout_ms,
        })
    }

    /// Authenticate with a bearer token.
    #[must_use]
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Absolute URL for a backend-relative path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ProxyTransport for DirectTransport {
    async fn send(&self, request: ProxyRequest) -> Result<Value, ProxyError> {
        let url = self.url_for(&request.path);

        let builder = match request.method {
            HttpMethod::Get => {
                let url = Url::parse_with_params(&url, request.query_pairs()?).map_err(|e| {
                    ProxyError::InvalidRequest {
                        message: format!("Invalid URL {url}: {e}"),
                    }
                })?;
                self.client.get(url)
            }
            HttpMethod::Post => self.client.post(&url).json(&request.decoded_params()?),
        };

        let response = with_token(builder, self.token.as_ref())
            .send()
            .await
            .map_err(|e| send_error(&e, &url, self.timeout_ms))?;

        decode_response(response).await
    }
}

/// Transport selected from configuration.
#[derive(Debug, Clone)]
pub enum Transport {
    /// Host panel proxy function.
    Host(HostProxyTransport),
    /// Time-series API directly.
    Direct(DirectTransport),
}

impl Transport {
    /// Build the transport described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ProxyError> {
        let transport = match config.transport {
            TransportKind::Proxy => {
                let mut host = HostProxyTransport::new(&config.endpoint, config.request_timeout_ms)?
                    .with_function(&config.proxy_function);
                if let Some(token) = &config.token {
                    host = host.with_token(token.clone());
                }
                Self::Host(host)
            }
            TransportKind::Direct => {
                let mut direct = DirectTransport::new(&config.endpoint, config.request_timeout_ms)?;
                if let Some(token) = &config.token {
                    direct = direct.with_token(token.clone());
                }
                Self::Direct(direct)
            }
        };
        Ok(transport)
    }
}

#[async_trait]
impl ProxyTransport for Transport {
    async fn send(&self, request: ProxyRequest) -> Result<Value, ProxyError> {
        match self {
            Self::Host(t) => t.send(request).await,
            Self::Direct(t) => t.send(request).await,
        }
    }
}
