//! Request statistics.
//!
//! This module provides:
//! - Per-path invocation counts
//! - Latency measurements
//! - Success/failure rates
//!
//! [`crate::proxy::ProxyClient`] records one event per logical call.
//!
//! # Example
//!
//! ```
//! use promdash::stats::{RequestEvent, RequestStats};
//!
//! let stats = RequestStats::new();
//! stats.record(RequestEvent::new("api/v1/query", 120, true));
//! stats.record(RequestEvent::new("api/v1/query", 80, false));
//! stats.record(RequestEvent::new("api/v1/query_range", 300, true));
//!
//! let summary = stats.summary();
//! assert_eq!(summary.total_requests, 3);
//! assert_eq!(summary.by_path["api/v1/query"].failed, 1);
//! ```

#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// Maximum number of events kept; older events are dropped first.
const MAX_EVENTS: usize = 10_000;

/// A single recorded proxy call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEvent {
    /// Backend path that was called.
    pub path: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Whether the call succeeded.
    pub success: bool,
    /// Timestamp of the event (Unix epoch seconds).
    pub timestamp: u64,
}

impl RequestEvent {
    /// Create a new event stamped with the current time.
    #[must_use]
    pub fn new(path: impl Into<String>, latency_ms: u64, success: bool) -> Self {
        Self {
            path: path.into(),
            latency_ms,
            success,
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }
}

/// Summary statistics for one path.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PathSummary {
    /// Total calls.
    pub total: u64,
    /// Successful calls.
    pub successful: u64,
    /// Failed calls.
    pub failed: u64,
    /// Average latency in milliseconds.
    pub avg_latency_ms: f64,
    /// Maximum latency in milliseconds.
    pub max_latency_ms: u64,
}

/// Overall statistics summary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StatsSummary {
    /// Total calls across all paths.
    pub total_requests: u64,
    /// Fraction of calls that succeeded (0.0-1.0), 0 when idle.
    pub success_rate: f64,
    /// Per-path summaries.
    pub by_path: HashMap<String, PathSummary>,
}

/// Thread-safe store of recent request events.
#[derive(Debug, Default)]
pub struct RequestStats {
    events: RwLock<Vec<RequestEvent>>,
}

impl RequestStats {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    pub fn record(&self, event: RequestEvent) {
        match self.events.write() {
            Ok(mut events) => {
                if events.len() >= MAX_EVENTS {
                    events.remove(0);
                }
                events.push(event);
            }
            Err(_) => {
                tracing::error!(path = %event.path, "Failed to record request event: RwLock poisoned");
            }
        }
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().map_or(0, |e| e.len())
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Summarize recorded events per path.
    #[must_use]
    pub fn summary(&self) -> StatsSummary {
        let Ok(events) = self.events.read() else {
            tracing::error!("Failed to read request events: RwLock poisoned");
            return StatsSummary::default();
        };

        let mut by_path: HashMap<String, PathSummary> = HashMap::new();
        let mut latency_sums: HashMap<&str, u64> = HashMap::new();

        for event in events.iter() {
            let entry = by_path.entry(event.path.clone()).or_default();
            entry.total += 1;
            if event.success {
                entry.successful += 1;
            } else {
                entry.failed += 1;
            }
            entry.max_latency_ms = entry.max_latency_ms.max(event.latency_ms);
            *latency_sums.entry(event.path.as_str()).or_default() += event.latency_ms;
        }

        for (path, summary) in &mut by_path {
            let sum = latency_sums.get(path.as_str()).copied().unwrap_or(0);
            summary.avg_latency_ms = sum as f64 / summary.total as f64;
        }

        let total_requests = events.len() as u64;
        let successful: u64 = by_path.values().map(|s| s.successful).sum();
        let success_rate = if total_requests == 0 {
            0.0
        } else {
            successful as f64 / total_requests as f64
        };

        StatsSummary {
            total_requests,
            success_rate,
            by_path,
        }
    }
}
