//! Test utilities and mock factories.
//!
//! This module provides shared testing infrastructure:
//! - Mock transports with canned replies
//! - Fixed clocks
//! - Backend payload fixtures
//!
//! Only compiled for tests (`#[cfg(test)]`).

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};

use crate::error::ProxyError;
use crate::proxy::ProxyRequest;
use crate::traits::{FixedTimeProvider, MockProxyTransport};

/// Epoch seconds every fixed clock in the tests reads.
pub const TEST_NOW: i64 = 1_700_000_000;

/// Clock pinned at [`TEST_NOW`].
#[must_use]
pub fn fixed_clock() -> FixedTimeProvider {
    FixedTimeProvider::at_secs(TEST_NOW)
}

/// Mock transport answering every call with `payload`.
#[must_use]
pub fn mock_transport_success(payload: Value) -> MockProxyTransport {
    let mut mock = MockProxyTransport::new();
    mock.expect_send().returning(move |_| Ok(payload.clone()));
    mock
}

/// Mock transport failing every call with `error`.
#[must_use]
pub fn mock_transport_error(error: ProxyError) -> MockProxyTransport {
    let mut mock = MockProxyTransport::new();
    mock.expect_send().returning(move |_| Err(error.clone()));
    mock
}

/// Parameters of `request` as a JSON value.
#[must_use]
pub fn decoded_params(request: &ProxyRequest) -> Value {
    serde_json::from_str(&request.params).unwrap()
}

/// Canonical range-query payload with two solar charger series ending at [`TEST_NOW`].
#[must_use]
pub fn mppt_matrix() -> Value {
    json!({
        "status": "success",
        "data": {
            "resultType": "matrix",
            "result": [
                {
                    "metric": {"__name__": "mppt_values", "sensor": "aku gerilimi", "job": "mppt"},
                    "values": [[TEST_NOW - 15, "12.5"], [TEST_NOW, "12.7"]]
                },
                {
                    "metric": {"__name__": "mppt_values", "sensor": "panel akimi", "job": "mppt"},
                    "values": [[TEST_NOW - 15, "3.25"], [TEST_NOW, "3.5"]]
                }
            ]
        }
    })
}

/// Canonical instant-query payload with one `up` sample per target.
#[must_use]
pub fn up_vector(values: &[&str]) -> Value {
    let result: Vec<Value> = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            json!({
                "metric": {"__name__": "up", "instance": format!("host-{i}:9100")},
                "value": [TEST_NOW, v]
            })
        })
        .collect();
    json!({"status": "success", "data": {"resultType": "vector", "result": result}})
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::{HttpMethod, Params};
    use crate::traits::{ProxyTransport, TimeProvider};

    #[test]
    fn test_fixed_clock() {
        assert_eq!(fixed_clock().now().timestamp(), TEST_NOW);
    }

    #[tokio::test]
    async fn test_mock_transport_factories() {
        let request = ProxyRequest::new("api/v1/query", &Params::new(), HttpMethod::Get).unwrap();

        let ok = mock_transport_success(json!([1]));
        assert_eq!(ok.send(request.clone()).await.unwrap(), json!([1]));

        let err = mock_transport_error(ProxyError::Network {
            message: "down".into(),
        });
        assert!(err.send(request).await.is_err());
    }

    #[test]
    fn test_fixtures_shape() {
        assert_eq!(mppt_matrix()["data"]["result"].as_array().unwrap().len(), 2);
        assert_eq!(up_vector(&["1", "0"])["data"]["result"][1]["value"][1], "0");
    }
}
