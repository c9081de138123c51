//! Chart series construction.
//!
//! This module provides:
//! - [`SeriesNamer`]: a display name derived from a label set
//! - [`SeriesPoint`] / [`ChartSeries`]: the chart-ready series format
//!
//! Naming rules:
//! 1. A `sensor` label is the whole name.
//! 2. Otherwise `__name__`, else `Unknown`, followed by the first of
//!    ` (role)`, ` (job)` unless the job is `isa`, ` (instance)`.
//!
//! Empty label values count as absent.
//!
//! # Example
//!
//! ```
//! use promdash::series::{Labels, SeriesNamer};
//!
//! let labels: Labels = [("__name__", "up"), ("job", "node")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//! assert_eq!(SeriesNamer::name(&labels), "up (node)");
//! ```

#![allow(clippy::cast_possible_truncation)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::normalize::Labels;
use crate::normalize::RawResult;

/// Name used when a series has neither `sensor` nor `__name__`.
pub const UNKNOWN_SERIES: &str = "Unknown";

/// Jobs that are never appended to a series name.
const SILENT_JOBS: &[&str] = &["isa"];

/// One sample, serialized as `[timestamp_ms, value]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(i64, f64)", into = "(i64, f64)")]
pub struct SeriesPoint {
    /// Milliseconds since the epoch.
    pub timestamp_ms: i64,
    /// Sample value; `NaN` when the backend value was not numeric.
    pub value: f64,
}

impl From<(i64, f64)> for SeriesPoint {
    fn from((timestamp_ms, value): (i64, f64)) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }
}

impl From<SeriesPoint> for (i64, f64) {
    fn from(point: SeriesPoint) -> Self {
        (point.timestamp_ms, point.value)
    }
}

impl SeriesPoint {
    /// Convert a backend sample `[seconds, "value"]`.
    ///
    /// Returns `None` when the timestamp is missing or not numeric.
    #[must_use]
    pub fn from_sample(sample: &Value) -> Option<Self> {
        let pair = sample.as_array()?;
        let seconds = pair.first().and_then(number)?;
        if !seconds.is_finite() {
            return None;
        }
        let value = pair.get(1).and_then(number).unwrap_or(f64::NAN);
        Some(Self {
            timestamp_ms: (seconds.trunc() as i64).saturating_mul(1000),
            value,
        })
    }
}

/// Numeric reading of a JSON number or numeric string.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A named series ready for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// Display name; `labels` is the series identity.
    pub name: String,
    /// Samples in backend order.
    pub data: Vec<SeriesPoint>,
    /// Full label set.
    pub labels: Labels,
}

/// Derives display names and chart series from raw results.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeriesNamer;

impl SeriesNamer {
    /// Display name for `labels`.
    #[must_use]
    pub fn name(labels: &Labels) -> String {
        let present = |key: &str| labels.get(key).filter(|v| !v.is_empty());

        if let Some(sensor) = present("sensor") {
            return sensor.clone();
        }

        let base = present("__name__").map_or(UNKNOWN_SERIES, String::as_str);
        let suffix = present("role")
            .or_else(|| present("job").filter(|job| !SILENT_JOBS.contains(&job.as_str())))
            .or_else(|| present("instance"));

        match suffix {
            Some(suffix) => format!("{base} ({suffix})"),
            None => base.to_string(),
        }
    }

    /// Chart series for a range result. Samples with unusable timestamps are skipped.
    #[must_use]
    pub fn to_chart_series(result: &RawResult) -> ChartSeries {
        ChartSeries {
            name: Self::name(&result.metric),
            data: result
                .values
                .iter()
                .filter_map(SeriesPoint::from_sample)
                .collect(),
            labels: result.metric.clone(),
        }
    }

    /// Chart series for every range result, in backend order.
    #[must_use]
    pub fn chart_series(results: &[RawResult]) -> Vec<ChartSeries> {
        results.iter().map(Self::to_chart_series).collect()
    }

    /// Current value of an instant result.
    ///
    /// `None` when the result has no sample or the value is not numeric.
    #[must_use]
    pub fn instant_value(result: &RawResult) -> Option<f64> {
        result
            .value
            .as_ref()
            .and_then(SeriesPoint::from_sample)
            .map(|p| p.value)
            .filter(|v| !v.is_nan())
    }
}
