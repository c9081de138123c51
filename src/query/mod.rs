//! Dashboard query state.
//!
//! [`DashboardQueries`] is the facade the dashboard layer drives. It holds
//! the current query, range selection and last fetched series, and wires
//! the pipeline together:
//!
//! ```text
//! query + range -> RangeResolver -> ProxyClient -> ResponseNormalizer -> SeriesNamer
//! ```
//!
//! Fetch operations never fail. Transport failures degrade to an empty
//! result and are recorded as the last error; undecodable payloads are
//! treated as "no data".
//!
//! Concurrent fetches are not cancelled: whichever finishes last wins.

#![allow(clippy::missing_panics_doc)]

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{MetricCatalog, RefreshOutcome};
use crate::error::ProxyError;
use crate::normalize::{RawResult, ResponseNormalizer};
use crate::proxy::ProxyClient;
use crate::range::{
    CustomBounds, RangeOverride, RangePreset, RangeResolver, ResolvedRange, TimeRange,
};
use crate::series::{ChartSeries, SeriesNamer};
use crate::suggest::{SuggestionItem, SuggestionRanker};
use crate::traits::{ProxyTransport, TimeProvider};

/// Observable dashboard state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Current query expression.
    pub current_query: String,
    /// Selected range preset.
    pub range_preset: RangePreset,
    /// Custom bounds, only meaningful for [`RangePreset::Custom`].
    pub custom_bounds: CustomBounds,
    /// Series from the last fetch.
    pub series: Vec<ChartSeries>,
    /// True while a fetch is in flight.
    pub loading: bool,
    /// Message of the last failed fetch.
    pub last_error: Option<String>,
    /// Range used by the last range query.
    pub current_range: Option<ResolvedRange>,
}

/// Stateful query facade over a proxy client and metric catalog.
#[derive(Debug)]
pub struct DashboardQueries<T, P>
where
    T: ProxyTransport,
    P: TimeProvider,
{
    client: ProxyClient<T>,
    time: P,
    catalog: Arc<MetricCatalog>,
    ranker: SuggestionRanker,
    state: Mutex<DashboardSnapshot>,
}

impl<T, P> DashboardQueries<T, P>
where
    T: ProxyTransport,
    P: TimeProvider,
{
    /// Create a facade with the default catalog and vocabulary.
    #[must_use]
    pub fn new(client: ProxyClient<T>, time: P) -> Self {
        Self {
            client,
            time,
            catalog: Arc::new(MetricCatalog::default()),
            ranker: SuggestionRanker::default(),
            state: Mutex::new(DashboardSnapshot::default()),
        }
    }

    /// Share an existing catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<MetricCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Use a different suggestion ranker.
    #[must_use]
    pub fn with_ranker(mut self, ranker: SuggestionRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Start with `preset` selected.
    #[must_use]
    pub fn with_range(self, preset: RangePreset) -> Self {
        self.state().range_preset = preset;
        self
    }

    /// The shared metric catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Arc<MetricCatalog> {
        &self.catalog
    }

    /// The underlying proxy client.
    #[must_use]
    pub const fn client(&self) -> &ProxyClient<T> {
        &self.client
    }

    fn state(&self) -> MutexGuard<'_, DashboardSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::error!("Dashboard state lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn now_secs(&self) -> i64 {
        self.time.now().timestamp()
    }

    /// Store `query` and fetch its series.
    pub async fn set_query(&self, query: impl Into<String>) {
        self.state().current_query = query.into();
        self.fetch_metrics_data().await;
    }

    /// Select `preset` and refetch. A non-custom preset clears custom bounds.
    pub async fn set_range(&self, preset: RangePreset) {
        {
            let mut state = self.state();
            state.range_preset = preset;
            if preset != RangePreset::Custom {
                state.custom_bounds = CustomBounds::default();
            }
        }
        self.fetch_metrics_data().await;
    }

    /// Store custom bounds. Takes effect on the next fetch.
    pub fn set_custom_bounds(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
        self.state().custom_bounds = CustomBounds::new(start, end);
    }

    /// The selected time range.
    #[must_use]
    pub fn time_range(&self) -> TimeRange {
        let state = self.state();
        TimeRange::from_preset(state.range_preset, state.custom_bounds)
    }

    /// Fetch series for the current query. No-op when the query is empty.
    pub async fn fetch_metrics_data(&self) {
        let query = {
            let mut state = self.state();
            if state.current_query.is_empty() {
                return;
            }
            state.loading = true;
            state.last_error = None;
            state.current_query.clone()
        };

        let series = self.range_query(&query).await;

        let mut state = self.state();
        state.series = series;
        state.loading = false;
    }

    /// Raw results of an instant query.
    pub async fn instant_query(&self, query: &str) -> Vec<RawResult> {
        match self.client.instant_query(query).await {
            Ok(payload) => ResponseNormalizer::extract_results(&payload),
            Err(e) => self.degrade(query, &e),
        }
    }

    /// Series for `query` over the selected range.
    pub async fn range_query(&self, query: &str) -> Vec<ChartSeries> {
        let range = RangeResolver::resolve(&self.time_range(), self.now_secs());
        self.state().current_range = Some(range);
        self.run_range_query(query, &range).await
    }

    /// Series for `query` over explicit parameters, ignoring the selected range.
    pub async fn range_query_with(&self, query: &str, range: RangeOverride) -> Vec<ChartSeries> {
        let range = RangeResolver::resolve_override(&range, self.now_secs());
        self.run_range_query(query, &range).await
    }

    async fn run_range_query(&self, query: &str, range: &ResolvedRange) -> Vec<ChartSeries> {
        match self.client.range_query(query, range).await {
            Ok(payload) => SeriesNamer::chart_series(&ResponseNormalizer::extract_results(&payload)),
            Err(e) => self.degrade(query, &e),
        }
    }

    /// Current value of the first series returned by `query`.
    pub async fn panel_value(&self, query: &str) -> Option<f64> {
        self.instant_query(query)
            .await
            .first()
            .and_then(SeriesNamer::instant_value)
    }

    /// Series for a chart panel over the selected range.
    pub async fn panel_chart_data(&self, query: &str) -> Vec<ChartSeries> {
        self.range_query(query).await
    }

    /// Values of `label` on series of `metric`. An empty metric matches all series.
    pub async fn label_values(&self, metric: &str, label: &str) -> Vec<String> {
        let matcher = Some(metric).filter(|m| !m.is_empty());
        match self.client.label_values(label, matcher).await {
            Ok(payload) => ResponseNormalizer::extract_label_values(&payload),
            Err(e) => self.degrade(label, &e),
        }
    }

    /// Grow the metric catalog from the backend.
    pub async fn refresh_catalog(&self) -> RefreshOutcome {
        self.catalog.refresh(&self.client).await
    }

    /// Ranked autocomplete candidates for `input`.
    #[must_use]
    pub fn suggestions(&self, input: &str) -> Vec<SuggestionItem> {
        self.ranker.suggest(input, &self.catalog)
    }

    /// Copy of the observable state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state().clone()
    }

    /// Log a failed fetch, record it unless it means "no data", and yield nothing.
    fn degrade<R>(&self, target: &str, err: &ProxyError) -> Vec<R> {
        if err.is_no_data() {
            tracing::debug!(request = %target, error = %err, "Undecodable payload, treating as no data");
        } else {
            tracing::warn!(request = %target, status = err.status(), error = %err, "Fetch failed");
            self.state().last_error = Some(err.to_string());
        }
        Vec::new()
    }
}
