//! Dashboard fetches through the host panel proxy.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use promdash::proxy::{HostProxyTransport, ProxyClient};
use promdash::query::DashboardQueries;
use promdash::range::{RangeOverride, RangePreset};
use promdash::series::SeriesPoint;
use promdash::traits::FixedTimeProvider;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const NOW: i64 = 1_700_000_000;

fn dashboard(server: &MockServer) -> DashboardQueries<HostProxyTransport, FixedTimeProvider> {
    let transport = HostProxyTransport::new(format!("{}/panel/extension", server.uri()), 5_000)
        .expect("transport");
    DashboardQueries::new(ProxyClient::new(transport), FixedTimeProvider::at_secs(NOW))
}

/// Matches a host call whose decoded `params` document equals the expected object.
struct ParamsEq(Value);

impl Match for ParamsEq {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body.get("params").and_then(Value::as_str).map(str::to_string))
            .and_then(|params| serde_json::from_str::<Value>(&params).ok())
            .is_some_and(|params| params == self.0)
    }
}

fn params_eq(expected: Value) -> ParamsEq {
    ParamsEq(expected)
}

/// Host reply wrapping a backend body.
fn host_reply(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"message": body, "status": 200}))
}

#[tokio::test]
async fn test_range_query_two_series_last_hour() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/panel/extension"))
        .and(body_partial_json(json!({
            "lmntargetFunction": "prometheus_proxy",
            "path": "api/v1/query_range",
            "method": "GET"
        })))
        .and(params_eq(json!({"query": "mppt_values", "start": NOW - 3_600, "end": NOW, "step": 15})))
        .respond_with(host_reply(json!({
            "status": "success",
            "data": {"resultType": "matrix", "result": [
                {"metric": {"__name__": "mppt_values", "sensor": "aku gerilimi", "job": "mppt"},
                 "values": [[NOW - 15, "12.5"], [NOW, "12.75"]]},
                {"metric": {"__name__": "mppt_values", "role": "charger", "job": "mppt"},
                 "values": [[NOW - 15, "3"], [NOW, "3.5"]]}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = dashboard(&server);
    dashboard.set_query("mppt_values").await;

    let snapshot = dashboard.snapshot();
    assert_eq!(snapshot.last_error, None);
    assert_eq!(snapshot.series.len(), 2);

    let first = &snapshot.series[0];
    assert_eq!(first.name, "aku gerilimi");
    assert_eq!(
        first.data,
        vec![
            SeriesPoint::from(((NOW - 15) * 1000, 12.5)),
            SeriesPoint::from((NOW * 1000, 12.75)),
        ]
    );

    let second = &snapshot.series[1];
    assert_eq!(second.name, "mppt_values (charger)");
    assert_eq!(second.labels["job"], "mppt");
    assert_eq!(second.data[1], SeriesPoint::from((NOW * 1000, 3.5)));
}

#[tokio::test]
async fn test_switching_range_refetches_with_new_step() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(params_eq(json!({"query": "up", "start": NOW - 604_800, "end": NOW, "step": 1_800})))
        .respond_with(host_reply(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(params_eq(json!({"query": "up", "start": NOW - 3_600, "end": NOW, "step": 15})))
        .respond_with(host_reply(json!({"result": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = dashboard(&server);
    dashboard.set_query("up").await;
    dashboard.set_range(RangePreset::Last7d).await;

    let snapshot = dashboard.snapshot();
    assert_eq!(snapshot.range_preset, RangePreset::Last7d);
    assert_eq!(snapshot.current_range.map(|r| r.step), Some(1_800));
}

#[tokio::test]
async fn test_panel_value_and_override_range() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"path": "api/v1/query"})))
        .respond_with(host_reply(json!({
            "status": "success",
            "data": {"resultType": "vector", "result": [
                {"metric": {"__name__": "node_memory_MemTotal_bytes"}, "value": [NOW, "8589934592"]}
            ]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"path": "api/v1/query_range"})))
        .and(params_eq(json!({"query": "up", "start": NOW - 600, "end": NOW - 60, "step": 30})))
        .respond_with(host_reply(json!([
            {"metric": {"__name__": "up", "instance": "node:9100"}, "values": [[NOW - 600, "1"]]}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = dashboard(&server);
    assert_eq!(
        dashboard.panel_value("node_memory_MemTotal_bytes").await,
        Some(8_589_934_592.0)
    );

    let series = dashboard
        .range_query_with(
            "up",
            RangeOverride::starting_at(NOW - 600).with_end(NOW - 60).with_step(30),
        )
        .await;
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].name, "up (node:9100)");
}

#[tokio::test]
async fn test_label_values_through_host() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"path": "api/v1/label/sensor/values"})))
        .and(params_eq(json!({"match": "mppt_values"})))
        .respond_with(host_reply(json!({"status": "success", "data": ["aku gerilimi", "panel akimi"]})))
        .mount(&server)
        .await;

    let dashboard = dashboard(&server);
    assert_eq!(
        dashboard.label_values("mppt_values", "sensor").await,
        vec!["aku gerilimi", "panel akimi"]
    );
}
