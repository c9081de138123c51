//! Trait definitions for mockable dependencies.
//!
//! This module defines traits for:
//! - [`ProxyTransport`]: the intermediary that carries a logical proxy call
//! - [`TimeProvider`]: Time abstraction for testing
//!
//! # Mocking
//!
//! All traits are annotated with `#[cfg_attr(test, mockall::automock)]`
//! which generates mock implementations automatically for testing.
//!
//! # Example
//!
//! ```
//! use promdash::traits::{TimeProvider, RealTimeProvider};
//!
//! let time_provider = RealTimeProvider;
//! let now = time_provider.now();
//! println!("Current time: {now}");
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::ProxyError;
use crate::proxy::ProxyRequest;

/// Transport that carries a logical proxy call to the backend.
///
/// Network library, authentication and base URL resolution live behind
/// this trait. Implementations return the decoded JSON payload or a
/// classified [`ProxyError`]; they must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProxyTransport: Send + Sync {
    /// Send a single request.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError`] if the destination is unreachable, answers
    /// with a non-success status, or returns an undecodable body.
    async fn send(&self, request: ProxyRequest) -> Result<Value, ProxyError>;
}

#[async_trait]
impl<T> ProxyTransport for Arc<T>
where
    T: ProxyTransport + ?Sized,
{
    async fn send(&self, request: ProxyRequest) -> Result<Value, ProxyError> {
        self.as_ref().send(request).await
    }
}

/// Time provider trait for deterministic testing.
///
/// This trait abstracts time operations to allow for
/// deterministic testing by providing fixed timestamps.
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Get the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time provider using system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time provider pinned to a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider(pub DateTime<Utc>);

impl FixedTimeProvider {
    /// Pin the clock to `secs` since the epoch.
    ///
    /// Out-of-range values pin the clock to the epoch.
    #[must_use]
    pub fn at_secs(secs: i64) -> Self {
        Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
