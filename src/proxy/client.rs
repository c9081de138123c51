//! Proxy client.
//!
//! Builds logical requests for the time-series endpoints, hands them to a
//! [`ProxyTransport`] and records per-path statistics. No retries are
//! performed here; retry policy belongs to the caller.

#![allow(clippy::missing_errors_doc)]

use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};

use super::types::{
    label_values_path, HttpMethod, Params, ProxyRequest, QUERY_PATH, QUERY_RANGE_PATH,
};
use crate::error::ProxyError;
use crate::range::ResolvedRange;
use crate::stats::{RequestEvent, RequestStats};
use crate::traits::ProxyTransport;

/// Client for the time-series API behind the proxy.
#[derive(Debug)]
pub struct ProxyClient<T>
where
    T: ProxyTransport,
{
    transport: T,
    stats: Arc<RequestStats>,
}

impl<T> ProxyClient<T>
where
    T: ProxyTransport,
{
    /// Create a client over `transport`.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            stats: Arc::new(RequestStats::new()),
        }
    }

    /// Share an existing statistics store.
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<RequestStats>) -> Self {
        self.stats = stats;
        self
    }

    /// Statistics recorded by this client.
    #[must_use]
    pub fn stats(&self) -> &Arc<RequestStats> {
        &self.stats
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue one logical call.
    pub async fn call(
        &self,
        path: &str,
        params: &Params,
        method: HttpMethod,
    ) -> Result<Value, ProxyError> {
        let request = ProxyRequest::new(path, params, method)?;
        let start = Instant::now();

        tracing::debug!(path = %path, method = %method, "Starting proxy request");

        let result = self.transport.send(request).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(_) => {
                tracing::debug!(path = %path, elapsed_ms, "Proxy request completed");
            }
            Err(e) => {
                tracing::debug!(
                    path = %path,
                    elapsed_ms,
                    status = e.status(),
                    error = %e,
                    "Proxy request failed"
                );
            }
        }

        self.stats
            .record(RequestEvent::new(path, elapsed_ms, result.is_ok()));
        result
    }

    /// Evaluate `query` at the current instant.
    pub async fn instant_query(&self, query: &str) -> Result<Value, ProxyError> {
        self.call(QUERY_PATH, &to_params(json!({ "query": query })), HttpMethod::Get)
            .await
    }

    /// Evaluate `query` across `range`.
    pub async fn range_query(
        &self,
        query: &str,
        range: &ResolvedRange,
    ) -> Result<Value, ProxyError> {
        let params = to_params(json!({
            "query": query,
            "start": range.start,
            "end": range.end,
            "step": range.step,
        }));
        self.call(QUERY_RANGE_PATH, &params, HttpMethod::Get).await
    }

    /// List the values of `label`, optionally restricted by a series matcher.
    pub async fn label_values(
        &self,
        label: &str,
        matcher: Option<&str>,
    ) -> Result<Value, ProxyError> {
        let mut params = Params::new();
        if let Some(m) = matcher {
            params.insert("match".into(), Value::String(m.to_string()));
        }
        self.call(&label_values_path(label), &params, HttpMethod::Get)
            .await
    }
}

fn to_params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}
