use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode as UpstreamStatus;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use reqwest::StatusCode;
use serde_json::{json, Value};
use stockscan_lookup::{router, HttpProvider, LookupConfig, LookupService};

const WIDGET: &str = "0123456789012";
const UNKNOWN: &str = "4006381333931";
const BAD_PRICE: &str = "5901234123457";
const UNAVAILABLE: &str = "9780306406157";
const SLOW: &str = "0000000000017";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Fake product-data provider keyed on the posted barcode.
async fn product_data(Json(body): Json<Value>) -> axum::response::Response {
    match body["barcode"].as_str().unwrap_or_default() {
        WIDGET => Json(json!({
            "name": "Widget",
            "description": "A widget",
            "price": "9.99",
            "imageURL": "https://x/i.png"
        }))
        .into_response(),
        BAD_PRICE => Json(json!({
            "name": "Widget",
            "description": "A widget",
            "price": "N/A",
            "imageURL": "https://x/i.png"
        }))
        .into_response(),
        UNAVAILABLE => UpstreamStatus::SERVICE_UNAVAILABLE.into_response(),
        SLOW => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({})).into_response()
        }
        _ => UpstreamStatus::NOT_FOUND.into_response(),
    }
}

/// Upstream plus lookup API, both on ephemeral ports.
async fn spawn_stack() -> (TestServer, TestServer) {
    let upstream = TestServer::spawn(Router::new().route("/productData", post(product_data))).await;

    let mut config = LookupConfig::default();
    config.provider.url = format!("{}/productData", upstream.base_url);
    config.provider.timeout_ms = 300;
    config.validate().unwrap();

    let provider = HttpProvider::new(&config.provider).unwrap();
    let service = Arc::new(LookupService::from_config(Arc::new(provider), &config));
    let api = TestServer::spawn(router(service)).await;

    (upstream, api)
}

async fn lookup(api: &TestServer, body: Value) -> (StatusCode, Value) {
    let res = reqwest::Client::new()
        .post(format!("{}/lookup", api.base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn lookup_found_returns_normalized_record() {
    let (_upstream, api) = spawn_stack().await;

    let (status, body) = lookup(&api, json!({ "barcode": WIDGET })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget");
    assert_eq!(body["description"], "A widget");
    assert_eq!(body["price"], 9.99);
    assert_eq!(body["imageURL"], "https://x/i.png");
}

#[tokio::test]
async fn lookup_trims_scanner_whitespace() {
    let (_upstream, api) = spawn_stack().await;

    let (status, body) = lookup(&api, json!({ "barcode": format!(" {}\n", WIDGET) })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Widget");
}

#[tokio::test]
async fn lookup_rejects_malformed_barcodes() {
    let (_upstream, api) = spawn_stack().await;

    for barcode in ["bad", "", "012345678901", "0123456789013"] {
        let (status, body) = lookup(&api, json!({ "barcode": barcode })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "barcode {:?}", barcode);
        assert_eq!(body["kind"], "VALIDATION_ERROR");
        assert_eq!(body["retryable"], false);
    }

    let (status, body) = lookup(&api, json!({ "sku": WIDGET })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn lookup_unknown_barcode_is_404() {
    let (_upstream, api) = spawn_stack().await;

    let (status, body) = lookup(&api, json!({ "barcode": UNKNOWN })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "NOT_FOUND");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn lookup_bad_upstream_price_is_malformed() {
    let (_upstream, api) = spawn_stack().await;

    let (status, body) = lookup(&api, json!({ "barcode": BAD_PRICE })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "UPSTREAM_MALFORMED_RESPONSE");
    assert_eq!(body["retryable"], false);
}

#[tokio::test]
async fn lookup_upstream_error_status_is_transport() {
    let (_upstream, api) = spawn_stack().await;

    let (status, body) = lookup(&api, json!({ "barcode": UNAVAILABLE })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "UPSTREAM_TRANSPORT");
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn lookup_slow_upstream_times_out() {
    let (_upstream, api) = spawn_stack().await;

    let (status, body) = lookup(&api, json!({ "barcode": SLOW })).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["kind"], "UPSTREAM_TIMEOUT");
    assert_eq!(body["retryable"], true);
}

#[tokio::test]
async fn validate_item_round_trip_from_lookup() {
    let (_upstream, api) = spawn_stack().await;
    let client = reqwest::Client::new();

    let (_, record) = lookup(&api, json!({ "barcode": WIDGET })).await;
    let record: stockscan_core::ProductRecord = serde_json::from_value(record).unwrap();
    let draft = stockscan_core::ItemDraft::from_record(&record);

    let res = client
        .post(format!("{}/items/validate", api.base_url))
        .json(&draft)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let item: Value = res.json().await.unwrap();
    assert_eq!(item["name"], "Widget");
    assert_eq!(item["price"], 9.99);

    let res = client
        .post(format!("{}/items/validate", api.base_url))
        .json(&json!({ "name": "", "price": "1.00", "description": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let (_upstream, api) = spawn_stack().await;

    let res = reqwest::get(format!("{}/health", api.base_url)).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["server_time"].is_string());
}
