//! Retry behavior tests.
//!
//! # Invariants
//! - 429, 502, 503, 504 trigger retry with exponential backoff
//! - Retry-After (delta-seconds) is respected when present
//! - 400/404/500 do NOT trigger retry
//! - Exhausted retries surface `MaxRetriesExceeded` wrapping the last failure

mod common;

use common::*;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};

#[tokio::test]
async fn test_retry_on_429_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/routing/bgp/template"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/routing/bgp/template"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(load_fixture("bgp_template/list.json")),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 3);
    let items = client.list("/routing/bgp/template", &[]).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_retry_on_gateway_errors() {
    for status in [502u16, 503, 504] {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/routing/bgp/template/*2"))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/rest/routing/bgp/template/*2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(load_fixture("bgp_template/get.json")),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server, 2);
        let item = client.get("/routing/bgp/template/*2").await.unwrap();
        assert_eq!(item["name"], "temp1", "status {status} should be retried");
    }
}

#[tokio::test]
async fn test_max_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/routing/bgp/template"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 2);
    let err = client.list("/routing/bgp/template", &[]).await.unwrap_err();

    match err {
        ClientError::MaxRetriesExceeded(attempts, inner) => {
            assert_eq!(attempts, 3);
            assert!(matches!(*inner, ClientError::ApiError { status: 503, .. }));
        }
        other => panic!("expected MaxRetriesExceeded, got {other:?}"),
    }
}

#[tokio::test]
async fn test_zero_retries_means_single_attempt() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/routing/bgp/template/*2"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 0);
    let err = client.delete("/routing/bgp/template/*2").await.unwrap_err();
    assert!(matches!(err.root_cause(), ClientError::RateLimited(None)));
}

#[tokio::test]
async fn test_retry_after_header_is_respected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/system/resource"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/system/resource"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uptime": "1w2d", "version": "7.16"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 1);
    let start = Instant::now();
    let resource = client.get("/system/resource").await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(resource["version"], "7.16");
}

#[tokio::test]
async fn test_404_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/routing/bgp/template/*7"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, 3);
    let err = client.get("/routing/bgp/template/*7").await.unwrap_err();
    assert!(err.is_not_found());
}
