//! Prometheus dashboard query engine.
//!
//! Turns dashboard panel queries into range and instant calls against a
//! Prometheus-compatible API reached through a backend proxy, normalizes
//! the replies into chart-ready series, and ranks autocomplete
//! suggestions against a growing metric catalog.
//!
//! # Features
//!
//! - Preset and custom time ranges resolved to `start`/`end`/`step`
//! - Host panel proxy and direct HTTP transports
//! - Tolerant decoding of the proxy's response envelopes
//! - Metric catalog seeded from a built-in list and grown by discovery
//! - Prefix-aware suggestion ranking over metrics and query functions
//!
//! # Quick Start
//!
//! ```bash
//! PROMDASH_ENDPOINT=http://prometheus:9090 PROMDASH_TRANSPORT=direct \
//!     ./promdash range 'rate(node_cpu_seconds_total[5m])' --range last6h
//! ```
//!
//! # Architecture
//!
//! ```text
//! query + range ──▶ RangeResolver ──▶ ProxyClient ──▶ ResponseNormalizer ──▶ SeriesNamer
//!                                         │
//!                                         ▼
//!                              host proxy │ Prometheus
//!
//! keystrokes ──▶ SuggestionRanker ◀── MetricCatalog ◀── label discovery
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod normalize;
pub mod proxy;
pub mod query;
pub mod range;
pub mod series;
pub mod stats;
pub mod suggest;
pub mod traits;

#[cfg(test)]
mod test_utils;
