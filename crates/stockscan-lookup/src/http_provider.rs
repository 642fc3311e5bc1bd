//! # HTTP Provider
//!
//! [`ProductProvider`] backed by an HTTP product-data endpoint.
//!
//! ## Request / Response Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST <provider.url>   {"barcode": "0123456789012"}                     │
//! │                        (or barcode=0123456789012 with encoding=form)    │
//! │                                                                         │
//! │  200 + JSON object        ──► Found(raw)                                │
//! │  200 + empty body / null  ──► NotFound                                  │
//! │  404                      ──► NotFound                                  │
//! │  other non-2xx            ──► ProviderError::Status    (transport)      │
//! │  200 + not JSON           ──► ProviderError::MalformedResponse          │
//! │  body > MAX_BODY_BYTES    ──► ProviderError::MalformedResponse          │
//! │  connect/reset/DNS        ──► ProviderError::Transport                  │
//! │  reqwest timeout          ──► ProviderError::Timeout                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Connection Pool
//! One `reqwest::Client` is shared by every lookup, so keep-alive
//! connections are reused. A semaphore caps in-flight requests at
//! `provider.max_connections`; callers queue for a permit, and the wait
//! counts toward the caller's attempt timeout.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use stockscan_core::Barcode;
use tokio::sync::Semaphore;
use tracing::debug;
use url::Url;

use crate::config::{ProviderSettings, RequestEncoding};
use crate::error::{ConfigError, ProviderError, ProviderResult};
use crate::provider::{ProductProvider, ProviderResponse};

/// Largest provider response body read, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Serialize)]
struct BarcodeBody<'a> {
    barcode: &'a str,
}

/// HTTP product-data provider with a bounded connection pool.
pub struct HttpProvider {
    client: reqwest::Client,
    endpoint: Url,
    encoding: RequestEncoding,
    timeout: Duration,
    permits: Semaphore,
}

impl HttpProvider {
    /// Builds the pooled client from settings.
    pub fn new(settings: &ProviderSettings) -> Result<Self, ConfigError> {
        settings.check_max_connections()?;
        let endpoint = Url::parse(&settings.url)?;

        let client = reqwest::Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .pool_max_idle_per_host(settings.max_connections)
            .user_agent(concat!("stockscan-lookup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::ClientBuild(e.to_string()))?;

        Ok(HttpProvider {
            client,
            endpoint,
            encoding: settings.request_encoding,
            timeout: settings.timeout(),
            permits: Semaphore::new(settings.max_connections),
        })
    }

    /// Free request slots right now.
    pub fn available_connections(&self) -> usize {
        self.permits.available_permits()
    }

    /// Reads the body, refusing anything over [`MAX_BODY_BYTES`].
    async fn read_body(&self, mut response: reqwest::Response) -> ProviderResult<Vec<u8>> {
        let too_large = || {
            ProviderError::MalformedResponse(format!(
                "response body exceeds {} bytes",
                MAX_BODY_BYTES
            ))
        };

        if response
            .content_length()
            .is_some_and(|len| len > MAX_BODY_BYTES as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| self.map_error(e))? {
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    fn map_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                after_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ProductProvider for HttpProvider {
    async fn fetch(&self, barcode: &Barcode) -> ProviderResult<ProviderResponse> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ProviderError::Transport("connection pool closed".into()))?;

        let body = BarcodeBody {
            barcode: barcode.as_str(),
        };
        let request = self.client.post(self.endpoint.clone());
        let request = match self.encoding {
            RequestEncoding::Json => request.json(&body),
            RequestEncoding::Form => request.form(&body),
        };

        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        debug!(%barcode, status = status.as_u16(), "Provider responded");

        if status == StatusCode::NOT_FOUND {
            return Ok(ProviderResponse::NotFound);
        }
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = self.read_body(response).await?;
        parse_body(&body)
    }

    fn name(&self) -> &str {
        self.endpoint.host_str().unwrap_or("http")
    }
}

/// Interprets a 2xx body.
pub(crate) fn parse_body(body: &[u8]) -> ProviderResult<ProviderResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ProviderResponse::NotFound);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    match value {
        Value::Null => Ok(ProviderResponse::NotFound),
        value => Ok(ProviderResponse::Found(value)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
