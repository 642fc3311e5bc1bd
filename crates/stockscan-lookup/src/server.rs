//! # HTTP Server
//!
//! axum router exposing the lookup service.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /lookup          {"barcode": "..."}     → 200 ProductRecord       │
//! │                                                  or ApiError            │
//! │  POST /items/validate  ItemDraft              → 200 Item                │
//! │                                                  or 400 ApiError        │
//! │  GET  /health                                 → {status, server_time}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every request runs inside a `request` span carrying a fresh request id,
//! also returned in the `x-request-id` header.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stockscan_core::{Item, ItemDraft, LookupResult, ProductRecord};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::api::ApiError;
use crate::service::LookupService;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Body of `POST /lookup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupRequest {
    pub barcode: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub server_time: DateTime<Utc>,
}

/// Builds the router over a shared service.
pub fn router(service: Arc<LookupService>) -> Router {
    Router::new()
        .route("/lookup", post(lookup_handler))
        .route("/items/validate", post(validate_item_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn(request_span))
        .with_state(service)
}

// =============================================================================
// Handlers
// =============================================================================

async fn lookup_handler(
    State(service): State<Arc<LookupService>>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Result<Json<ProductRecord>, ApiError> {
    let Json(request) = payload?;

    match service.lookup_code(&request.barcode).await? {
        LookupResult::Found(record) => Ok(Json(record)),
        LookupResult::NotFound => Err(ApiError::not_found(request.barcode.trim())),
        LookupResult::UpstreamError { reason, message } => Err(ApiError::upstream(reason, message)),
    }
}

async fn validate_item_handler(
    payload: Result<Json<ItemDraft>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let Json(draft) = payload?;
    let item = draft.validate()?;
    debug!(name = %item.name, price = %item.price, "Item draft valid");
    Ok(Json(item))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        server_time: Utc::now(),
    })
}

/// Wraps each request in a span with a request id.
async fn request_span(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

// =============================================================================
// Unit Tests
// =============================================================================
