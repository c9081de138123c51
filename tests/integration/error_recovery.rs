//! Error recovery and edge case tests.
//!
//! Fetches must degrade to empty results while the dashboard keeps working.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::env;

use promdash::config::Config;
use promdash::error::{AppError, ConfigError};
use promdash::proxy::{HostProxyTransport, ProxyClient};
use promdash::query::DashboardQueries;
use promdash::traits::FixedTimeProvider;
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dashboard(uri: &str) -> DashboardQueries<HostProxyTransport, FixedTimeProvider> {
    let transport = HostProxyTransport::new(uri, 2_000).expect("transport");
    DashboardQueries::new(ProxyClient::new(transport), FixedTimeProvider::at_secs(1_700_000_000))
}

#[tokio::test]
async fn test_backend_error_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": "error",
            "error": "1:5: parse error: unexpected end of input"
        })))
        .mount(&server)
        .await;

    let dashboard = dashboard(&server.uri());
    dashboard.set_query("sum(").await;

    let snapshot = dashboard.snapshot();
    assert!(snapshot.series.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(
        snapshot.last_error.as_deref(),
        Some("Transport error (422): 1:5: parse error: unexpected end of input")
    );
}

#[tokio::test]
async fn test_host_wrapped_error_records_inner_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": {"status": "error", "message": "invalid parameter \"query\""},
            "status": 400
        })))
        .mount(&server)
        .await;

    let dashboard = dashboard(&server.uri());
    dashboard.set_query("sum(").await;

    assert_eq!(
        dashboard.snapshot().last_error.as_deref(),
        Some("Transport error (400): invalid parameter \"query\"")
    );
}

#[tokio::test]
async fn test_host_json_parse_error_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": {"status": "error", "message": "JSON Parse Error"},
            "status": 400
        })))
        .mount(&server)
        .await;

    let dashboard = dashboard(&server.uri());
    dashboard.set_query("up").await;

    let snapshot = dashboard.snapshot();
    assert!(snapshot.series.is_empty());
    assert_eq!(snapshot.last_error, None);
}

#[tokio::test]
async fn test_unexpected_shape_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": "shape"})))
        .mount(&server)
        .await;

    let dashboard = dashboard(&server.uri());
    dashboard.set_query("up").await;
    assert!(dashboard.panel_value("up").await.is_none());

    let snapshot = dashboard.snapshot();
    assert!(snapshot.series.is_empty());
    assert_eq!(snapshot.last_error, None);
}

#[tokio::test]
async fn test_html_login_page_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>Session expired</html>"))
        .mount(&server)
        .await;

    let dashboard = dashboard(&server.uri());
    assert!(dashboard.panel_chart_data("up").await.is_empty());
    assert_eq!(dashboard.snapshot().last_error, None);
}

#[tokio::test]
async fn test_unreachable_backend_keeps_suggestions_working() {
    // Nothing listens on port 9 of the loopback interface.
    let dashboard = dashboard("http://127.0.0.1:9/extension");

    assert!(dashboard.label_values("up", "job").await.is_empty());
    assert!(dashboard.snapshot().last_error.is_some());

    let seeded = dashboard.catalog().len();
    dashboard.refresh_catalog().await;
    assert_eq!(dashboard.catalog().len(), seeded);
    assert!(!dashboard.suggestions("mppt").is_empty());
}

#[test]
#[serial]
fn test_missing_endpoint_is_config_error() {
    env::remove_var("PROMDASH_ENDPOINT");

    let err: AppError = Config::from_env().unwrap_err().into();
    assert!(matches!(
        err,
        AppError::Config(ConfigError::MissingRequired { ref var }) if var == "PROMDASH_ENDPOINT"
    ));
}
