//! Proxy client and transports.
//!
//! This module provides:
//! - [`ProxyRequest`]: one logical call (`path`, JSON `params`, `method`)
//! - [`ProxyClient`]: endpoint helpers over any [`crate::traits::ProxyTransport`]
//! - [`HostProxyTransport`] and [`DirectTransport`]: `reqwest` transports
//!
//! # Example
//!
//! ```
//! use promdash::proxy::{HttpMethod, Params, ProxyRequest, QUERY_PATH};
//! use serde_json::json;
//!
//! let mut params = Params::new();
//! params.insert("query".into(), json!("up"));
//!
//! let request = ProxyRequest::new(QUERY_PATH, &params, HttpMethod::Get).unwrap();
//! assert_eq!(request.params, r#"{"query":"up"}"#);
//! ```

mod client;
mod transport;
mod types;

pub use client::ProxyClient;
pub use transport::{
    DirectTransport, HostProxyTransport, Transport, TransportKind, DEFAULT_PROXY_FUNCTION,
    DEFAULT_TIMEOUT_MS, HOST_PARSE_ERROR,
};
pub use types::{
    label_values_path, HttpMethod, Params, ProxyRequest, QUERY_PATH, QUERY_RANGE_PATH,
};
