//! Integration tests for the dashboard query engine.
//!
//! These tests drive the public API over real HTTP against `wiremock`
//! stubs, covering:
//! - Range and instant queries through the host proxy
//! - Direct transport calls
//! - Catalog discovery and suggestions
//! - Error recovery paths

mod catalog_workflow;
mod dashboard_workflow;
mod direct_workflow;
mod error_recovery;
