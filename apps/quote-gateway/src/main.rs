//! Quote Gateway Binary
//!
//! Starts the stock data API gateway.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin quote-gateway
//! ```
//!
//! # Environment Variables
//!
//! ## Required for `/api/stock-data`
//! - `ALPHA_VANTAGE_API_KEY`: Upstream API key (absence degrades the
//!   endpoint to 500; predict and stream keep working)
//!
//! ## Optional
//! - `QUOTE_GATEWAY_PORT`: HTTP listen port (default: 3000)
//! - `QUOTE_GATEWAY_UPSTREAM_URL`: Upstream base URL
//! - `QUOTE_GATEWAY_UPSTREAM_TIMEOUT_SECS`: Upstream timeout (default: 10)
//! - `QUOTE_GATEWAY_DATA_MODE`: "quote" | "series" (default: quote)
//! - `QUOTE_GATEWAY_CACHE_TTL_SECS`: Cache TTL (default: 300)
//! - `QUOTE_GATEWAY_CACHE_CAPACITY`: Cache LRU bound (default: 256)
//! - `QUOTE_GATEWAY_STREAM_INTERVAL_MS`: Tick period (default: 1000)
//! - `QUOTE_GATEWAY_STREAM_MAX_SECS`: Stream cap, 0 = unbounded (default: 300)
//! - `QUOTE_GATEWAY_PREDICTION`: "threshold" | "trend" (default: threshold)
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use quote_gateway::infrastructure::telemetry;
use quote_gateway::{
    AlphaVantageClient, ApiServer, AppConfig, AppState, StockDataService, TtlCache,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    telemetry::init();

    tracing::info!("Starting Quote Gateway");

    let config = AppConfig::from_env();
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let fetcher = Arc::new(AlphaVantageClient::new(&config.upstream)?);
    let cache = Arc::new(TtlCache::new(&config.cache));
    let service = Arc::new(StockDataService::new(fetcher, cache, config.upstream.mode));

    let state = AppState {
        service,
        prediction: config.prediction,
        stream: config.stream.clone(),
    };

    let server = ApiServer::new(config.server.port, state, shutdown_token.clone());
    let server_cancel = shutdown_token.clone();
    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "API server error");
            // A dead server must not leave the process idling on signals.
            server_cancel.cancel();
        }
    });

    await_shutdown(shutdown_token).await;
    let _ = server_task.await;

    tracing::info!("Quote gateway stopped");
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration.
fn log_config(config: &AppConfig) {
    tracing::info!(
        port = config.server.port,
        data_mode = config.upstream.mode.as_str(),
        prediction = config.prediction.as_str(),
        api_key_set = config.upstream.api_key.is_some(),
        cache_ttl_secs = config.cache.ttl.as_secs(),
        cache_capacity = config.cache.capacity,
        "Configuration loaded"
    );
    tracing::debug!(
        upstream_url = %config.upstream.base_url,
        tick_interval = ?config.stream.tick_interval,
        stream_max = ?config.stream.max_duration,
        "Gateway settings"
    );
}

/// Wait for a shutdown signal (SIGTERM or SIGINT), or for the token to be
/// cancelled elsewhere (e.g. server startup failure).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
        () = shutdown_token.cancelled() => {
            tracing::info!("Shutdown requested, stopping");
        }
    }

    shutdown_token.cancel();
}
