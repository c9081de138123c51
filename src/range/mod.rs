//! Time range resolution.
//!
//! This module turns a dashboard time range selection into the absolute
//! `start`/`end`/`step` triple sent with a range query.
//!
//! # Presets
//!
//! | Preset | Lookback | Step |
//! |--------|----------|------|
//! | last1h | 3600s | 15s |
//! | last6h | 21600s | 60s |
//! | last24h | 86400s | 300s |
//! | last7d | 604800s | 1800s |
//! | custom | bounds, default 3600s | `max(60, span / 120)` |
//!
//! # Example
//!
//! ```
//! use promdash::range::{RangeResolver, TimeRange};
//!
//! let resolved = RangeResolver::resolve(&TimeRange::Last6h, 1_700_000_000);
//! assert_eq!(resolved.start, 1_700_000_000 - 21_600);
//! assert_eq!(resolved.end, 1_700_000_000);
//! assert_eq!(resolved.step, 60);
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Lookback used when a custom range has no lower bound.
pub const DEFAULT_LOOKBACK_SECS: i64 = 3_600;

/// Number of samples a custom range aims for.
pub const CUSTOM_TARGET_POINTS: i64 = 120;

/// Smallest step used for custom ranges.
pub const CUSTOM_MIN_STEP_SECS: u64 = 60;

/// Step used when an explicit override omits one.
pub const OVERRIDE_DEFAULT_STEP_SECS: u64 = 60;

/// Named range preset as selected in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangePreset {
    /// The last hour.
    #[default]
    #[serde(rename = "last1h")]
    Last1h,
    /// The last six hours.
    #[serde(rename = "last6h")]
    Last6h,
    /// The last day.
    #[serde(rename = "last24h")]
    Last24h,
    /// The last week.
    #[serde(rename = "last7d")]
    Last7d,
    /// User-chosen bounds.
    #[serde(rename = "custom")]
    Custom,
}

impl RangePreset {
    /// All presets in display order.
    pub const ALL: [Self; 5] = [
        Self::Last1h,
        Self::Last6h,
        Self::Last24h,
        Self::Last7d,
        Self::Custom,
    ];

    /// Wire name of the preset.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Last1h => "last1h",
            Self::Last6h => "last6h",
            Self::Last24h => "last24h",
            Self::Last7d => "last7d",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangePreset {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RangeError::InvalidPreset {
                value: s.to_string(),
            })
    }
}

/// Optional inclusive bounds of a custom range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CustomBounds {
    /// Lower bound. Falls back to `now - 3600` when absent.
    pub start: Option<DateTime<Utc>>,
    /// Upper bound. Falls back to `now` when absent.
    pub end: Option<DateTime<Utc>>,
}

impl CustomBounds {
    /// Create bounds from optional endpoints.
    #[must_use]
    pub const fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Returns true if neither bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// A dashboard time range selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "preset", rename_all = "lowercase")]
pub enum TimeRange {
    /// The last hour.
    #[default]
    #[serde(rename = "last1h")]
    Last1h,
    /// The last six hours.
    #[serde(rename = "last6h")]
    Last6h,
    /// The last day.
    #[serde(rename = "last24h")]
    Last24h,
    /// The last week.
    #[serde(rename = "last7d")]
    Last7d,
    /// Custom bounds.
    Custom(CustomBounds),
}

impl TimeRange {
    /// Build a range from a preset, using `bounds` only for [`RangePreset::Custom`].
    #[must_use]
    pub const fn from_preset(preset: RangePreset, bounds: CustomBounds) -> Self {
        match preset {
            RangePreset::Last1h => Self::Last1h,
            RangePreset::Last6h => Self::Last6h,
            RangePreset::Last24h => Self::Last24h,
            RangePreset::Last7d => Self::Last7d,
            RangePreset::Custom => Self::Custom(bounds),
        }
    }

    /// The preset this range was built from.
    #[must_use]
    pub const fn preset(&self) -> RangePreset {
        match self {
            Self::Last1h => RangePreset::Last1h,
            Self::Last6h => RangePreset::Last6h,
            Self::Last24h => RangePreset::Last24h,
            Self::Last7d => RangePreset::Last7d,
            Self::Custom(_) => RangePreset::Custom,
        }
    }
}

/// Absolute query range parameters in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRange {
    /// Range start (epoch seconds).
    pub start: i64,
    /// Range end (epoch seconds).
    pub end: i64,
    /// Query resolution in seconds, always at least 1.
    pub step: u64,
}

impl ResolvedRange {
    /// Width of the range in seconds. Negative for an inverted custom range.
    #[must_use]
    pub const fn span_secs(&self) -> i64 {
        self.end - self.start
    }
}

/// Explicit range parameters that bypass the selected preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeOverride {
    /// Range start (epoch seconds).
    pub start: i64,
    /// Range end, `now` when absent.
    pub end: Option<i64>,
    /// Step in seconds, 60 when absent.
    pub step: Option<u64>,
}

impl RangeOverride {
    /// Create an override starting at `start`.
    #[must_use]
    pub const fn starting_at(start: i64) -> Self {
        Self {
            start,
            end: None,
            step: None,
        }
    }

    /// Set the range end.
    #[must_use]
    pub const fn with_end(mut self, end: i64) -> Self {
        self.end = Some(end);
        self
    }

    /// Set the step.
    #[must_use]
    pub const fn with_step(mut self, step: u64) -> Self {
        self.step = Some(step);
        self
    }
}

/// Resolves [`TimeRange`] selections against a fixed "now".
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeResolver;

impl RangeResolver {
    /// Resolve a range relative to `now` (epoch seconds).
    #[must_use]
    pub fn resolve(range: &TimeRange, now: i64) -> ResolvedRange {
        let (lookback, step) = match range {
            TimeRange::Last1h => (3_600, 15),
            TimeRange::Last6h => (6 * 3_600, 60),
            TimeRange::Last24h => (24 * 3_600, 300),
            TimeRange::Last7d => (7 * 24 * 3_600, 1_800),
            TimeRange::Custom(bounds) => return Self::resolve_custom(bounds, now),
        };

        ResolvedRange {
            start: now - lookback,
            end: now,
            step,
        }
    }

    /// Resolve explicit parameters relative to `now`.
    ///
    /// A zero step is raised to 1.
    #[must_use]
    pub fn resolve_override(range: &RangeOverride, now: i64) -> ResolvedRange {
        ResolvedRange {
            start: range.start,
            end: range.end.unwrap_or(now),
            step: range.step.unwrap_or(OVERRIDE_DEFAULT_STEP_SECS).max(1),
        }
    }

    fn resolve_custom(bounds: &CustomBounds, now: i64) -> ResolvedRange {
        let start = bounds
            .start
            .map_or(now - DEFAULT_LOOKBACK_SECS, |t| t.timestamp());
        let end = bounds.end.map_or(now, |t| t.timestamp());

        // Inverted ranges floor to a negative bucket and clamp to the minimum.
        let buckets = (end - start).div_euclid(CUSTOM_TARGET_POINTS);
        let step = u64::try_from(buckets)
            .unwrap_or(0)
            .max(CUSTOM_MIN_STEP_SECS);

        ResolvedRange { start, end, step }
    }
}

/// Parse a custom range bound.
///
/// Accepts epoch seconds, RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM`
/// and `YYYY-MM-DD`. Naive values are taken as UTC.
///
/// # Errors
///
/// Returns [`RangeError::InvalidTimestamp`] if no format matches.
pub fn parse_bound(value: &str) -> Result<DateTime<Utc>, RangeError> {
    let trimmed = value.trim();
    let invalid = || RangeError::InvalidTimestamp {
        value: value.to_string(),
    };

    if let Ok(secs) = trimmed.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0).ok_or_else(invalid);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(invalid)
}
