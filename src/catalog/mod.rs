//! Metric name catalog.
//!
//! This module provides:
//! - [`BUILTIN_METRICS`]: names known before any discovery call
//! - [`MetricCatalog`]: the shared, grow-only set of known metric names
//!
//! The catalog is seeded at construction and grows through
//! [`MetricCatalog::refresh`], which asks the backend for every
//! `__name__` value. Once it holds more than [`CATALOG_SIZE_CEILING`]
//! names further refreshes are skipped. Names are never removed.
//!
//! # Example
//!
//! ```
//! use promdash::catalog::MetricCatalog;
//!
//! let catalog = MetricCatalog::new(["up", "go_info", "up"]);
//! assert_eq!(catalog.names(), vec!["up", "go_info"]);
//!
//! let added = catalog.merge(&["node_load1".to_string()]).unwrap();
//! assert_eq!(added, 1);
//! assert_eq!(catalog.names(), vec!["go_info", "node_load1", "up"]);
//! ```

use std::collections::BTreeSet;
use std::sync::RwLock;

use crate::error::CatalogError;
use crate::normalize::ResponseNormalizer;
use crate::proxy::ProxyClient;
use crate::traits::ProxyTransport;

/// Catalog size above which discovery is no longer attempted.
pub const CATALOG_SIZE_CEILING: usize = 200;

/// Label whose values are the metric names.
pub const METRIC_NAME_LABEL: &str = "__name__";

/// Metric names seeded into the default catalog.
pub const BUILTIN_METRICS: &[&str] = &[
    "mppt_values",
    "up",
    "scrape_duration_seconds",
    "scrape_samples_scraped",
    "scrape_samples_post_metric_relabeling",
    "scrape_series_added",
    "go_goroutines",
    "go_threads",
    "go_memstats_alloc_bytes",
    "go_memstats_heap_inuse_bytes",
    "go_memstats_heap_alloc_bytes",
    "go_memstats_sys_bytes",
    "go_gc_duration_seconds",
    "go_info",
    "net_conntrack_dialer_conn_attempted_total",
    "net_conntrack_dialer_conn_established_total",
    "net_conntrack_dialer_conn_failed_total",
    "process_cpu_seconds_total",
    "process_open_fds",
    "process_max_fds",
    "process_resident_memory_bytes",
    "process_start_time_seconds",
    "process_virtual_memory_bytes",
    "prometheus_http_requests_total",
    "prometheus_http_request_duration_seconds_bucket",
    "prometheus_tsdb_head_series",
    "prometheus_tsdb_head_samples_appended_total",
    "prometheus_tsdb_head_chunks",
    "prometheus_tsdb_compaction_duration_seconds_bucket",
    "prometheus_target_scrapes_sample_out_of_bounds_total",
    "prometheus_target_scrapes_sample_duplicate_timestamp_total",
    "prometheus_target_sync_failed_total",
    "prometheus_remote_storage_samples_total",
    "prometheus_remote_storage_samples_failed_total",
    "prometheus_remote_storage_queue_highest_timestamp_seconds",
    "prometheus_rule_evaluation_failures_total",
    "prometheus_rule_group_duration_seconds",
    "prometheus_sd_discovered_targets",
    "prometheus_sd_failed_configs",
    "prometheus_build_info",
    "prometheus_ready",
    "promhttp_metric_handler_requests_total",
    "promhttp_metric_handler_requests_in_flight",
    "node_cpu_seconds_total",
    "node_memory_MemTotal_bytes",
    "node_filesystem_size_bytes",
    "container_cpu_usage_seconds_total",
    "container_memory_usage_bytes",
    "go_sched_latencies_seconds_bucket",
    "go_mutex_wait_seconds_total",
    "go_gc_mark_assist_cpu_seconds_total",
    "go_gc_cpu_seconds_total",
    "go_gc_pauses_seconds_bucket",
    "go_scavenge_cpu_seconds_total",
    "go_memlimit_bytes",
    "go_memstats_alloc_bytes_total",
    "go_memstats_buck_hash_sys_bytes",
    "go_memstats_frees_total",
    "go_memstats_gc_cpu_fraction",
    "go_memstats_gc_sys_bytes",
    "go_memstats_heap_idle_bytes",
    "go_memstats_heap_objects",
    "go_memstats_heap_released_bytes",
    "go_memstats_heap_sys_bytes",
    "go_memstats_last_gc_time_seconds",
    "go_memstats_lookups_total",
    "go_memstats_mallocs_total",
    "go_memstats_mcache_inuse_bytes",
    "go_memstats_mcache_sys_bytes",
    "go_memstats_mspan_inuse_bytes",
    "go_memstats_mspan_sys_bytes",
    "go_memstats_next_gc_bytes",
    "go_memstats_other_sys_bytes",
    "go_memstats_stack_inuse_bytes",
    "go_memstats_stack_sys_bytes",
    "go_memstats_sys_bytes",
    "go_cgo_calls_count",
    "go_cpu_count",
    "go_gc_forced_count",
    "go_gomaxprocs",
    "process_cpu_seconds_system_total",
    "process_cpu_seconds_user_total",
    "process_major_pagefaults_total",
    "process_minor_pagefaults_total",
    "process_num_threads",
    "process_resident_memory_peak_bytes",
    "process_resident_memory_anon_bytes",
    "process_resident_memory_file_bytes",
    "process_resident_memory_shared_bytes",
    "process_io_read_bytes_total",
    "process_io_written_bytes_total",
    "process_io_read_syscalls_total",
    "process_io_write_syscalls_total",
    "process_io_storage_read_bytes_total",
    "process_io_storage_written_bytes_total",
    "process_pressure_cpu_waiting_seconds_total",
    "process_pressure_cpu_stalled_seconds_total",
    "process_pressure_io_waiting_seconds_total",
    "process_pressure_io_stalled_seconds_total",
    "process_pressure_memory_waiting_seconds_total",
    "process_pressure_memory_stalled_seconds_total",
];

/// Result of a [`MetricCatalog::refresh`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The catalog is above the size ceiling; no call was made.
    Skipped,
    /// The response was empty, malformed, or added nothing new.
    Unchanged,
    /// New names were merged in.
    Extended {
        /// Number of names added.
        added: usize,
    },
    /// Discovery failed; the catalog is untouched.
    Failed(CatalogError),
}

/// Shared set of known metric names.
#[derive(Debug)]
pub struct MetricCatalog {
    builtin: Vec<String>,
    names: RwLock<Vec<String>>,
    ceiling: usize,
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::new(BUILTIN_METRICS.iter().copied())
    }
}

impl MetricCatalog {
    /// Create a catalog seeded with `builtin`.
    #[must_use]
    pub fn new<I, S>(builtin: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let catalog = Self {
            builtin: builtin.into_iter().map(Into::into).collect(),
            names: RwLock::new(Vec::new()),
            ceiling: CATALOG_SIZE_CEILING,
        };
        catalog.seed();
        catalog
    }

    /// Use a different size ceiling.
    #[must_use]
    pub const fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }

    /// Add any missing built-in names, keeping their order. Idempotent.
    pub fn seed(&self) {
        let Ok(mut names) = self.names.write() else {
            tracing::error!("Failed to seed metric catalog: RwLock poisoned");
            return;
        };
        for name in &self.builtin {
            if !name.trim().is_empty() && !names.contains(name) {
                names.push(name.clone());
            }
        }
    }

    /// Snapshot of the known names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.names.read().map_or_else(
            |_| {
                tracing::error!("Failed to read metric catalog: RwLock poisoned");
                Vec::new()
            },
            |names| names.clone(),
        )
    }

    /// Number of known names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.read().map_or(0, |n| n.len())
    }

    /// Returns true if no names are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `name` is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names
            .read()
            .is_ok_and(|names| names.iter().any(|n| n == name))
    }

    /// Returns true once the catalog has outgrown discovery.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.len() > self.ceiling
    }

    /// Union `discovered` into the catalog and sort it.
    ///
    /// Blank names are dropped. Returns the number of names added.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LockPoisoned`] if a writer panicked.
    pub fn merge(&self, discovered: &[String]) -> Result<usize, CatalogError> {
        let mut names = self.names.write().map_err(|_| {
            tracing::error!("Failed to update metric catalog: RwLock poisoned");
            CatalogError::LockPoisoned
        })?;

        let before = names.len();
        let merged: BTreeSet<String> = names
            .drain(..)
            .chain(discovered.iter().cloned())
            .filter(|n| !n.trim().is_empty())
            .collect();
        *names = merged.into_iter().collect();

        Ok(names.len().saturating_sub(before))
    }

    /// Discover metric names from the backend and merge them in.
    ///
    /// Never fails: errors are logged and reported as
    /// [`RefreshOutcome::Failed`] with the catalog untouched.
    pub async fn refresh<T>(&self, client: &ProxyClient<T>) -> RefreshOutcome
    where
        T: ProxyTransport,
    {
        if self.is_frozen() {
            tracing::debug!(size = self.len(), "Metric catalog frozen, skipping discovery");
            return RefreshOutcome::Skipped;
        }

        let payload = match client.label_values(METRIC_NAME_LABEL, None).await {
            Ok(payload) => payload,
            Err(e) => {
                let err = CatalogError::from(e);
                tracing::warn!(error = %err, "Metric discovery failed, keeping current catalog");
                return RefreshOutcome::Failed(err);
            }
        };

        let discovered = ResponseNormalizer::extract_label_values(&payload);
        if discovered.is_empty() {
            tracing::debug!("Metric discovery returned no names");
            return RefreshOutcome::Unchanged;
        }

        match self.merge(&discovered) {
            Ok(0) => RefreshOutcome::Unchanged,
            Ok(added) => {
                tracing::info!(added, size = self.len(), "Metric catalog extended");
                RefreshOutcome::Extended { added }
            }
            Err(e) => RefreshOutcome::Failed(e),
        }
    }
}
