//! Provider round trips against an in-process HTTP server.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pcbquote_rates::{ExchangeRateApiProvider, ProxyRateProvider, RateError, RateProvider};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn latest(Path(base): Path<String>) -> (StatusCode, Json<Value>) {
    match base.as_str() {
        "CNY" => (
            StatusCode::OK,
            Json(json!({ "base": "CNY", "rates": { "CNY": 1, "USD": 0.1389 } })),
        ),
        "EUR" => (StatusCode::OK, Json(json!({ "base": "EUR", "rates": {} }))),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "unsupported-code" })),
        ),
    }
}

async fn proxy(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match (params.get("from").map(String::as_str), params.get("to").map(String::as_str)) {
        (Some("CNY"), Some("USD")) => (StatusCode::OK, Json(json!({ "rate": 0.1392 }))),
        (Some("CNY"), Some("JPY")) => (StatusCode::OK, Json(json!({ "rate": -1 }))),
        _ => (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": "upstream unavailable" })),
        ),
    }
}

#[tokio::test]
async fn test_public_api_fetches_requested_pair() {
    let base_url = serve(Router::new().route("/v4/latest/{base}", get(latest))).await;
    let provider = ExchangeRateApiProvider::new(format!("{}/v4/latest", base_url));

    let rate = provider.latest_rate("CNY", "USD").await.unwrap();
    assert_eq!(rate.rate, dec!(0.1389));
    assert_eq!(rate.base, "CNY");
    assert_eq!(rate.quote, "USD");
    assert_eq!(rate.source, "EXCHANGE_RATE_API");
}

#[tokio::test]
async fn test_public_api_failures() {
    let base_url = serve(Router::new().route("/v4/latest/{base}", get(latest))).await;
    let provider = ExchangeRateApiProvider::new(format!("{}/v4/latest", base_url));

    let err = provider.latest_rate("XXX", "USD").await.unwrap_err();
    assert!(matches!(err, RateError::HttpStatus { status: 404, .. }));

    let err = provider.latest_rate("EUR", "USD").await.unwrap_err();
    assert!(matches!(err, RateError::MissingRate { .. }));
}

#[tokio::test]
async fn test_proxy_fetches_requested_pair() {
    let base_url = serve(Router::new().route("/api/exchange-rate", get(proxy))).await;
    let provider = ProxyRateProvider::new(format!("{}/api/exchange-rate", base_url));

    let rate = provider.latest_rate("CNY", "USD").await.unwrap();
    assert_eq!(rate.rate, dec!(0.1392));
    assert_eq!(rate.source, "RATE_PROXY");
}

#[tokio::test]
async fn test_proxy_failures() {
    let base_url = serve(Router::new().route("/api/exchange-rate", get(proxy))).await;
    let provider = ProxyRateProvider::new(format!("{}/api/exchange-rate", base_url));

    let err = provider.latest_rate("CNY", "JPY").await.unwrap_err();
    assert!(matches!(err, RateError::NonPositiveRate { .. }));

    let err = provider.latest_rate("CNY", "EUR").await.unwrap_err();
    assert!(matches!(err, RateError::HttpStatus { status: 502, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let provider = ProxyRateProvider::new(format!("http://{}/api/exchange-rate", addr));
    let err = provider.latest_rate("CNY", "USD").await.unwrap_err();
    assert!(matches!(err, RateError::Network(_)));
}
