//! Queries straight against a Prometheus HTTP API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use promdash::config::{Config, SecretString};
use promdash::proxy::{ProxyClient, Transport, TransportKind};
use promdash::query::DashboardQueries;
use promdash::range::RangePreset;
use promdash::traits::FixedTimeProvider;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOW: i64 = 1_700_000_000;

fn direct_config(server: &MockServer) -> Config {
    let mut config = Config::new(server.uri());
    config.transport = TransportKind::Direct;
    config.token = Some(SecretString::new("prom-token"));
    config.default_range = RangePreset::Last6h;
    config
}

#[tokio::test]
async fn test_direct_range_query_from_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query_range"))
        .and(header("authorization", "Bearer prom-token"))
        .and(query_param("query", "rate(node_cpu_seconds_total[5m])"))
        .and(query_param("start", (NOW - 21_600).to_string()))
        .and(query_param("end", NOW.to_string()))
        .and(query_param("step", "60"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"resultType": "matrix", "result": [
                {"metric": {"cpu": "0", "mode": "idle", "instance": "node:9100"},
                 "values": [[NOW - 60, "0.93"], [NOW, "0.95"]]}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = direct_config(&server);
    let transport = Transport::from_config(&config).unwrap();
    let dashboard = DashboardQueries::new(ProxyClient::new(transport), FixedTimeProvider::at_secs(NOW))
        .with_range(config.default_range);

    dashboard.set_query("rate(node_cpu_seconds_total[5m])").await;

    let snapshot = dashboard.snapshot();
    assert_eq!(snapshot.series.len(), 1);
    assert_eq!(snapshot.series[0].name, "Unknown (node:9100)");
    assert_eq!(snapshot.series[0].data[0].timestamp_ms, (NOW - 60) * 1000);

    let stats = dashboard.client().stats().summary();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.by_path["api/v1/query_range"].successful, 1);
}

#[tokio::test]
async fn test_direct_label_values_bare_array() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/label/job/values"))
        .and(query_param("match", "up"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["node", "prometheus"])))
        .mount(&server)
        .await;

    let transport = Transport::from_config(&direct_config(&server)).unwrap();
    let dashboard = DashboardQueries::new(ProxyClient::new(transport), FixedTimeProvider::at_secs(NOW));

    assert_eq!(dashboard.label_values("up", "job").await, vec!["node", "prometheus"]);
}
