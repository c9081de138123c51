//! Response normalization.
//!
//! The proxy hands back query results in one of several envelopes
//! depending on which layer wrapped them. This module classifies a payload
//! into a [`ResponseShape`] and extracts the inner result list, or an
//! empty list when no shape matches.
//!
//! Shapes, in priority order:
//! 1. `{"status": "success", "data": {"result": [...]}}`
//! 2. `{"result": [...]}`
//! 3. `[...]`
//!
//! # Example
//!
//! ```
//! use promdash::normalize::ResponseNormalizer;
//! use serde_json::json;
//!
//! let payload = json!({"result": [{"metric": {"__name__": "up"}, "value": [1, "1"]}]});
//! let results = ResponseNormalizer::extract_results(&payload);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].metric["__name__"], "up");
//!
//! assert!(ResponseNormalizer::extract_results(&json!({"unexpected": "shape"})).is_empty());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Label set identifying a series.
pub type Labels = BTreeMap<String, String>;

/// Envelope a query payload arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape {
    /// `{"status": "success", "data": {"result": [...]}}`.
    Canonical(Vec<Value>),
    /// `{"result": [...]}`.
    Unwrapped(Vec<Value>),
    /// A bare array of results.
    Bare(Vec<Value>),
    /// Anything else; treated as "no data".
    Unrecognized,
}

impl ResponseShape {
    /// Classify `payload`.
    #[must_use]
    pub fn classify(payload: &Value) -> Self {
        let canonical = payload
            .get("status")
            .and_then(Value::as_str)
            .filter(|s| *s == "success")
            .and_then(|_| payload.get("data"))
            .and_then(|d| d.get("result"))
            .and_then(Value::as_array);
        if let Some(results) = canonical {
            return Self::Canonical(results.clone());
        }

        if let Some(results) = payload.get("result").and_then(Value::as_array) {
            return Self::Unwrapped(results.clone());
        }

        match payload {
            Value::Array(results) => Self::Bare(results.clone()),
            _ => Self::Unrecognized,
        }
    }

    /// Shape name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Canonical(_) => "canonical",
            Self::Unwrapped(_) => "unwrapped",
            Self::Bare(_) => "bare",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// The inner result list; empty for [`ResponseShape::Unrecognized`].
    #[must_use]
    pub fn into_results(self) -> Vec<Value> {
        match self {
            Self::Canonical(r) | Self::Unwrapped(r) | Self::Bare(r) => r,
            Self::Unrecognized => Vec::new(),
        }
    }
}

/// One raw series as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    /// Label set. Non-string primitive labels are kept in their JSON form.
    pub metric: Labels,
    /// Range samples, each `[timestamp, "value"]`.
    #[serde(default)]
    pub values: Vec<Value>,
    /// Instant sample `[timestamp, "value"]`.
    #[serde(default)]
    pub value: Option<Value>,
}

impl RawResult {
    /// Build from a result entry, tolerating missing or ill-typed fields.
    #[must_use]
    pub fn from_value(entry: &Value) -> Self {
        let metric = entry
            .get("metric")
            .and_then(Value::as_object)
            .map(|labels| {
                labels
                    .iter()
                    .filter_map(|(k, v)| match v {
                        Value::String(s) => Some((k.clone(), s.clone())),
                        Value::Number(n) => Some((k.clone(), n.to_string())),
                        Value::Bool(b) => Some((k.clone(), b.to_string())),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let values = entry
            .get("values")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let value = entry.get("value").filter(|v| !v.is_null()).cloned();

        Self {
            metric,
            values,
            value,
        }
    }
}

/// Envelope a label-values payload arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelValuesShape {
    /// `{"data": [...]}`, optionally with `"status": "success"`.
    Data(Vec<String>),
    /// `{"message": {"data": [...]}}` as wrapped by the host panel.
    HostWrapped(Vec<String>),
    /// A bare array of names.
    Bare(Vec<String>),
    /// Anything else, including a non-success status.
    Unrecognized,
}

impl LabelValuesShape {
    /// Classify `payload`. Non-string entries are dropped.
    #[must_use]
    pub fn classify(payload: &Value) -> Self {
        if let Some(values) = payload
            .get("message")
            .and_then(|m| m.get("data"))
            .and_then(Value::as_array)
        {
            return Self::HostWrapped(strings(values));
        }

        let failed = payload
            .get("status")
            .and_then(Value::as_str)
            .is_some_and(|s| s != "success");
        if let Some(values) = payload.get("data").and_then(Value::as_array) {
            return if failed {
                Self::Unrecognized
            } else {
                Self::Data(strings(values))
            };
        }

        match payload {
            Value::Array(values) => Self::Bare(strings(values)),
            _ => Self::Unrecognized,
        }
    }

    /// The extracted names; empty for [`LabelValuesShape::Unrecognized`].
    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        match self {
            Self::Data(v) | Self::HostWrapped(v) | Self::Bare(v) => v,
            Self::Unrecognized => Vec::new(),
        }
    }
}

fn strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Extracts result lists from proxy payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    /// Raw results of a query payload, in backend order.
    #[must_use]
    pub fn extract_results(payload: &Value) -> Vec<RawResult> {
        let shape = ResponseShape::classify(payload);
        if shape == ResponseShape::Unrecognized {
            tracing::debug!("Query payload matched no known shape, treating as no data");
        }
        shape
            .into_results()
            .iter()
            .map(RawResult::from_value)
            .collect()
    }

    /// Names from a label-values payload.
    #[must_use]
    pub fn extract_label_values(payload: &Value) -> Vec<String> {
        LabelValuesShape::classify(payload).into_values()
    }
}
