//! End-to-end tests for the quote proxy HTTP surface.
//!
//! A wiremock server stands in for the upstream quote API; requests
//! are driven through the full axum router with `tower::ServiceExt`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use quote_proxy::server::AppState;
use quote_proxy::{BrapiClient, QuoteCache, QuoteService, create_router};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn proxy_against(upstream: &MockServer) -> Router {
    let client = BrapiClient::new(&upstream.uri(), Duration::from_secs(5)).unwrap();
    let service = QuoteService::new(Arc::new(QuoteCache::default()), client);
    create_router(AppState::new(Arc::new(service)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

fn quote_body(symbol: &str, price: f64) -> Value {
    json!({"results": [{"symbol": symbol, "regularMarketPrice": price}]})
}

#[tokio::test]
async fn second_quote_request_is_served_from_cache() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("PETR4", 38.5)))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, body) = get(&app, "/quote/PETR4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "upstream");
    assert_eq!(body["data"]["symbol"], "PETR4");

    let (status, body) = get(&app, "/quote/PETR4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "cache");
    assert_eq!(body["data"]["regularMarketPrice"], 38.5);

    // The expect(1) on the mock verifies exactly one upstream call.
}

#[tokio::test]
async fn ticker_spellings_normalize_to_one_cache_entry() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("PETR4", 38.5)))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, body) = get(&app, "/quote/%20petr4%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "upstream");

    let (_, body) = get(&app, "/quote/PETR4").await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn quote_and_full_quote_use_distinct_cache_entries() {
    let upstream = MockServer::start().await;

    // Mount the more specific mock first; wiremock matches in order.
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .and(query_param("fundamental", "true"))
        .and(query_param("dividends", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"symbol": "PETR4", "priceEarnings": 4.2}]})),
        )
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("PETR4", 38.5)))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (_, body) = get(&app, "/quote/PETR4").await;
    assert_eq!(body["source"], "upstream");

    // Same ticker, different request kind: must go upstream again.
    let (_, body) = get(&app, "/quote/PETR4/full").await;
    assert_eq!(body["source"], "upstream");
    assert_eq!(body["data"]["priceEarnings"], 4.2);
}

#[tokio::test]
async fn history_defaults_to_one_month_range() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .and(query_param("range", "1mo"))
        .and(query_param("interval", "1d"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"results": [{"historicalDataPrice": [1, 2, 3]}]})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, body) = get(&app, "/quote/PETR4/history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "upstream");
}

#[tokio::test]
async fn history_range_is_passed_through() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .and(query_param("range", "5y"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"range": "5y"}]})),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, _) = get(&app, "/quote/PETR4/history?range=5y").await;
    assert_eq!(status, StatusCode::OK);

    // Same ticker and range again: cache, not a second upstream call.
    let (_, body) = get(&app, "/quote/PETR4/history?range=5y").await;
    assert_eq!(body["source"], "cache");
}

#[tokio::test]
async fn upstream_500_fails_the_whole_request() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, body) = get(&app, "/quote/PETR4").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "upstream returned status 500");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn unknown_ticker_is_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/XPTO11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, body) = get(&app, "/quote/XPTO11").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "ticker not found: XPTO11");
}

#[tokio::test]
async fn malformed_upstream_body_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, _) = get(&app, "/quote/PETR4").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn batch_keeps_input_order_and_isolates_failures() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("PETR4", 38.5)))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/quote/BADTICKER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&upstream)
        .await;
    Mock::given(method("GET"))
        .and(path("/quote/VALE3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("VALE3", 61.2)))
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    let (status, body) = get(&app, "/quotes?tickers=PETR4,BADTICKER,VALE3").await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["ticker"], "PETR4");
    assert_eq!(results[0]["source"], "upstream");
    assert_eq!(results[0]["data"]["symbol"], "PETR4");

    assert_eq!(results[1]["ticker"], "BADTICKER");
    assert_eq!(results[1]["error"], "ticker not found: BADTICKER");
    assert!(results[1].get("data").is_none());

    assert_eq!(results[2]["ticker"], "VALE3");
    assert_eq!(results[2]["source"], "upstream");
}

#[tokio::test]
async fn batch_shares_the_quote_cache() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote/PETR4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_body("PETR4", 38.5)))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = proxy_against(&upstream);

    // Warm the cache through the single-quote endpoint.
    let (_, body) = get(&app, "/quote/PETR4").await;
    assert_eq!(body["source"], "upstream");

    // The batch endpoint reuses the same entry, including duplicates.
    let (_, body) = get(&app, "/quotes?tickers=petr4,PETR4").await;
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["source"], "cache");
    assert_eq!(results[1]["source"], "cache");
}
