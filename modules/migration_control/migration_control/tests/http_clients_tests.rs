#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Outbound HTTP adapters against mocked collaborators.

use std::time::Duration;

use httpmock::prelude::*;
use migration_control::domain::ports::{ArbiterClient, GatewayClient, SendOutcome, TrafficTransport};
use migration_control::infra::{HttpArbiterClient, HttpGatewayClient, HttpTrafficTransport};
use migration_control::{MigrationTarget, TrafficMethod};
use serde_json::json;

const TIMEOUT: Duration = Duration::from_millis(500);

#[tokio::test]
async fn gateway_weight_is_read_as_percent() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/admin/set-weight")
                .query_param("service", "php");
            then.status(200)
                .json_body(json!({"service": "php", "weight": 0.75}));
        })
        .await;

    let client = HttpGatewayClient::new(server.base_url(), TIMEOUT).unwrap();
    let weight = client.weight(&MigrationTarget::new("php")).await.unwrap();
    assert_eq!(weight, 75);
}

#[tokio::test]
async fn gateway_push_accepts_empty_answer() {
    let server = MockServer::start_async().await;
    let push = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/admin/set-weight")
                .json_body(json!({"service": "python", "weight": 1.0}));
            then.status(204);
        })
        .await;

    let client = HttpGatewayClient::new(format!("{}/", server.base_url()), TIMEOUT).unwrap();
    client
        .push_weight(&MigrationTarget::new("python"), 100)
        .await
        .unwrap();
    push.assert_calls_async(1).await;
}

#[tokio::test]
async fn gateway_garbage_lock_body_is_upstream_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/traffic-lock");
            then.status(200).body("not json");
        })
        .await;

    let client = HttpGatewayClient::new(server.base_url(), TIMEOUT).unwrap();
    let err = client.traffic_lock().await.unwrap_err();
    assert!(err.is_upstream());
}

#[tokio::test]
async fn gateway_timeout_is_upstream_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/admin/traffic-lock");
            then.status(200)
                .json_body(json!({"locked": false}))
                .delay(Duration::from_millis(800));
        })
        .await;

    let client = HttpGatewayClient::new(server.base_url(), Duration::from_millis(100)).unwrap();
    assert!(client.traffic_lock().await.unwrap_err().is_upstream());
}

#[tokio::test]
async fn arbiter_failure_envelope_is_upstream_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/status");
            then.status(200)
                .json_body(json!({"success": false, "message": "warming up"}));
        })
        .await;

    let client = HttpArbiterClient::new(server.base_url(), TIMEOUT).unwrap();
    let err = client.metrics().await.unwrap_err();
    assert!(err.is_upstream());
    assert!(err.to_string().contains("warming up"));
}

#[tokio::test]
async fn traffic_transport_reports_status_codes() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/transfer")
                .json_body(json!({"amount": 12, "mode": "shadow"}));
            then.status(503);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/transfer")
                .query_param("amount", "12")
                .query_param("mode", "split");
            then.status(200);
        })
        .await;

    let transport = HttpTrafficTransport::new(TIMEOUT).unwrap();
    let url = server.url("/transfer");

    let put = transport
        .send(&url, TrafficMethod::Put, &json!({"amount": 12, "mode": "shadow"}))
        .await;
    assert_eq!(put, SendOutcome::Status(503));
    assert!(!put.is_success());

    let get = transport
        .send(&url, TrafficMethod::Get, &json!({"amount": 12, "mode": "split"}))
        .await;
    assert!(get.is_success());
}

#[tokio::test]
async fn traffic_transport_reports_connection_failures() {
    let transport = HttpTrafficTransport::new(TIMEOUT).unwrap();
    let outcome = transport
        .send("http://127.0.0.1:1/transfer", TrafficMethod::Post, &json!({}))
        .await;
    assert!(matches!(outcome, SendOutcome::Failed(_)));
}
