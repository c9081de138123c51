//! Autocomplete suggestions.
//!
//! This module provides:
//! - [`SuggestionItem`]: a metric, function or aggregation candidate
//! - [`default_vocabulary`]: the built-in query functions and aggregations
//! - [`SuggestionRanker`]: substring filtering and ordering against input
//!
//! Ordering, all on case-folded labels:
//! 1. Exact match
//! 2. Prefix match
//! 3. Shorter label
//! 4. Lexicographic label
//!
//! Ties keep pool order (vocabulary before metrics).
//!
//! # Example
//!
//! ```
//! use promdash::suggest::SuggestionRanker;
//!
//! let ranker = SuggestionRanker::default();
//! let metrics = vec!["checksum_total".to_string()];
//! let labels: Vec<String> = ranker
//!     .rank("sum", &metrics)
//!     .into_iter()
//!     .map(|item| item.label)
//!     .collect();
//! assert_eq!(labels, vec!["sum", "sum_over_time", "checksum_total"]);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::MetricCatalog;

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 50;

/// Detail text attached to every metric suggestion.
pub const METRIC_DETAIL: &str = "Time series metric";

/// What a suggestion inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// A metric name from the catalog.
    Metric,
    /// A query function.
    Function,
    /// An aggregation operator.
    Aggregation,
}

/// One autocomplete candidate. Identity is `(kind, label)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionItem {
    /// Candidate kind, serialized as `type`.
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Inserted text.
    pub label: String,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SuggestionItem {
    /// Create an item.
    #[must_use]
    pub fn new(kind: SuggestionKind, label: impl Into<String>, detail: Option<&str>) -> Self {
        Self {
            kind,
            label: label.into(),
            detail: detail.map(str::to_string),
        }
    }

    /// Metric suggestion for `name`.
    #[must_use]
    pub fn metric(name: impl Into<String>) -> Self {
        Self::new(SuggestionKind::Metric, name, Some(METRIC_DETAIL))
    }
}

const VOCABULARY: &[(SuggestionKind, &str, &str)] = &[
    (SuggestionKind::Aggregation, "sum", "calculate sum over dimensions"),
    (SuggestionKind::Aggregation, "min", "select minimum over dimensions"),
    (SuggestionKind::Aggregation, "max", "select maximum over dimensions"),
    (SuggestionKind::Aggregation, "avg", "calculate average over dimensions"),
    (SuggestionKind::Aggregation, "count", "count number of elements in vector"),
    (SuggestionKind::Aggregation, "stddev", "calculate population standard deviation"),
    (SuggestionKind::Aggregation, "stdvar", "calculate population standard variance"),
    (SuggestionKind::Function, "rate", "per-second average rate of increase"),
    (SuggestionKind::Function, "irate", "instant rate of increase"),
    (SuggestionKind::Function, "increase", "increase in the time range"),
    (SuggestionKind::Function, "sum_over_time", "sum of values in interval"),
    (SuggestionKind::Function, "avg_over_time", "average value in interval"),
    (SuggestionKind::Function, "min_over_time", "minimum value in interval"),
    (SuggestionKind::Function, "max_over_time", "maximum value in interval"),
    (SuggestionKind::Function, "count_over_time", "count of values in interval"),
    (SuggestionKind::Function, "abs", "absolute value"),
    (SuggestionKind::Function, "ceil", "round up to nearest integer"),
    (SuggestionKind::Function, "floor", "round down to nearest integer"),
    (SuggestionKind::Function, "clamp", "clamp values between min and max"),
    (SuggestionKind::Function, "clamp_max", "clamp values to max"),
    (SuggestionKind::Function, "clamp_min", "clamp values to min"),
    (SuggestionKind::Function, "delta", "difference between first and last value"),
    (SuggestionKind::Function, "idelta", "difference between last two values"),
    (SuggestionKind::Function, "deriv", "per-second derivative"),
    (SuggestionKind::Function, "predict_linear", "predict value based on linear regression"),
];

/// Built-in functions and aggregations.
#[must_use]
pub fn default_vocabulary() -> Vec<SuggestionItem> {
    VOCABULARY
        .iter()
        .map(|(kind, label, detail)| SuggestionItem::new(*kind, *label, Some(*detail)))
        .collect()
}

/// Ranks suggestions against partial input.
#[derive(Debug, Clone)]
pub struct SuggestionRanker {
    vocabulary: Vec<SuggestionItem>,
    limit: usize,
}

impl Default for SuggestionRanker {
    fn default() -> Self {
        Self::new(default_vocabulary())
    }
}

impl SuggestionRanker {
    /// Create a ranker over `vocabulary`.
    #[must_use]
    pub const fn new(vocabulary: Vec<SuggestionItem>) -> Self {
        Self {
            vocabulary,
            limit: MAX_SUGGESTIONS,
        }
    }

    /// Return at most `limit` suggestions.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Static vocabulary in pool order.
    #[must_use]
    pub fn vocabulary(&self) -> &[SuggestionItem] {
        &self.vocabulary
    }

    /// Rank the vocabulary plus `metrics` against `input`.
    ///
    /// Empty input yields nothing.
    #[must_use]
    pub fn rank(&self, input: &str, metrics: &[String]) -> Vec<SuggestionItem> {
        if input.is_empty() {
            return Vec::new();
        }
        let needle = input.to_lowercase();

        let pool = self
            .vocabulary
            .iter()
            .cloned()
            .chain(metrics.iter().map(SuggestionItem::metric));

        let mut matches: Vec<(String, SuggestionItem)> = pool
            .filter_map(|item| {
                let folded = item.label.to_lowercase();
                folded.contains(&needle).then_some((folded, item))
            })
            .collect();

        matches.sort_by(|(a, _), (b, _)| compare(a, b, &needle));
        matches.truncate(self.limit);
        matches.into_iter().map(|(_, item)| item).collect()
    }

    /// Rank against the current contents of `catalog`.
    #[must_use]
    pub fn suggest(&self, input: &str, catalog: &MetricCatalog) -> Vec<SuggestionItem> {
        self.rank(input, &catalog.names())
    }
}

/// Order two case-folded labels for `needle`.
fn compare(a: &str, b: &str, needle: &str) -> Ordering {
    (b == needle)
        .cmp(&(a == needle))
        .then_with(|| b.starts_with(needle).cmp(&a.starts_with(needle)))
        .then_with(|| a.chars().count().cmp(&b.chars().count()))
        .then_with(|| a.cmp(b))
}
