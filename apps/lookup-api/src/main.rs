//! # Stockscan Lookup API
//!
//! HTTP server resolving scanned barcodes to product records.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. tracing (RUST_LOG or "info,stockscan=debug")                        │
//! │  2. LookupConfig: defaults → lookup.toml → STOCKSCAN_* env → validate   │
//! │  3. HttpProvider (pooled reqwest client)                                │
//! │  4. LookupService (timeout, retry, optional cache)                      │
//! │  5. axum::serve until Ctrl+C / SIGTERM                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use anyhow::Context;
use stockscan_lookup::{router, HttpProvider, LookupConfig, LookupService};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,stockscan=debug")),
        )
        .init();

    info!("Starting Stockscan lookup API...");

    let config = LookupConfig::load(None).context("loading configuration")?;
    info!(
        bind = %config.server.bind_address(),
        provider = %config.provider.url,
        timeout_ms = config.provider.timeout_ms,
        max_connections = config.provider.max_connections,
        max_retries = config.retry.max_retries,
        cache = config.cache.enabled,
        "Configuration loaded"
    );

    let provider = HttpProvider::new(&config.provider).context("building provider client")?;
    let service = Arc::new(LookupService::from_config(Arc::new(provider), &config));
    let app = router(service);

    let bind_addr = config.server.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!(addr = %bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
