//! Metric discovery and autocomplete.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use promdash::catalog::{MetricCatalog, RefreshOutcome, BUILTIN_METRICS};
use promdash::proxy::{HostProxyTransport, ProxyClient};
use promdash::query::DashboardQueries;
use promdash::suggest::SuggestionKind;
use promdash::traits::FixedTimeProvider;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn discovery_server(names: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "path": "api/v1/label/__name__/values",
            "params": "{}"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"status": "success", "data": names},
            "status": 200
        })))
        .mount(&server)
        .await;
    server
}

fn dashboard(
    server: &MockServer,
    catalog: Arc<MetricCatalog>,
) -> DashboardQueries<HostProxyTransport, FixedTimeProvider> {
    let transport = HostProxyTransport::new(server.uri(), 5_000).expect("transport");
    DashboardQueries::new(ProxyClient::new(transport), FixedTimeProvider::at_secs(0))
        .with_catalog(catalog)
}

#[tokio::test]
async fn test_refresh_twice_keeps_size() {
    let server = discovery_server(json!(["up", "solar_panel_watts", "battery_charge_ratio"])).await;
    let catalog = Arc::new(MetricCatalog::default());
    let dashboard = dashboard(&server, Arc::clone(&catalog));

    let seeded = catalog.len();
    assert_eq!(
        dashboard.refresh_catalog().await,
        RefreshOutcome::Extended { added: 2 }
    );
    let size = catalog.len();
    assert_eq!(size, seeded + 2);

    assert_eq!(dashboard.refresh_catalog().await, RefreshOutcome::Unchanged);
    assert_eq!(catalog.len(), size);

    let names = catalog.names();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_large_catalog_stops_discovery() {
    let discovered: Vec<String> = (0..150).map(|i| format!("exporter_metric_{i:03}")).collect();
    let server = discovery_server(json!(discovered)).await;
    let catalog = Arc::new(MetricCatalog::new(BUILTIN_METRICS.iter().copied()));
    let dashboard = dashboard(&server, Arc::clone(&catalog));

    assert!(matches!(
        dashboard.refresh_catalog().await,
        RefreshOutcome::Extended { added: 150 }
    ));
    assert!(catalog.is_frozen());
    assert_eq!(dashboard.refresh_catalog().await, RefreshOutcome::Skipped);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_discovered_metrics_are_suggested() {
    let server = discovery_server(json!(["measure_suite"])).await;
    let dashboard = dashboard(&server, Arc::new(MetricCatalog::new(["sum_of_squares"])));

    dashboard.refresh_catalog().await;
    let suggestions = dashboard.suggestions("su");
    let labels: Vec<&str> = suggestions.iter().map(|s| s.label.as_str()).collect();

    assert_eq!(
        labels,
        vec!["sum", "sum_over_time", "sum_of_squares", "measure_suite"]
    );
    assert_eq!(suggestions[0].kind, SuggestionKind::Aggregation);
    assert_eq!(suggestions[2].kind, SuggestionKind::Metric);
}
