//! API Server
//!
//! Axum HTTP server exposing the gateway's endpoints:
//!
//! - `POST /api/predict` - Next-price prediction from a number list
//! - `GET /api/stock-data?symbol=S` - Cached quote or daily series
//! - `GET /api/stock-stream` - Simulated SSE tick stream
//! - `GET /healthz` - Liveness probe
//!
//! Every failure is recovered here and mapped to an HTTP status with a
//! JSON `{ error, details? }` body; nothing propagates as a raw fault.

mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::application::services::StockDataService;
use crate::domain::prediction::PredictionMethod;
use crate::infrastructure::config::StreamSettings;

pub use error::ApiError;
pub use handlers::{PredictRequest, PredictResponse};

// =============================================================================
// Application State
// =============================================================================

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Cache-then-fetch stock data service.
    pub service: Arc<StockDataService>,
    /// Heuristic served by the predict endpoint.
    pub prediction: PredictionMethod,
    /// Simulated stream settings.
    pub stream: StreamSettings,
}

/// Build the API router over the given state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/predict", post(handlers::predict))
        .route("/api/stock-data", get(handlers::stock_data))
        .route("/api/stock-stream", get(handlers::stock_stream))
        .route("/healthz", get(handlers::liveness))
        .with_state(state)
}

// =============================================================================
// API Server
// =============================================================================

/// API HTTP server.
pub struct ApiServer {
    port: u16,
    state: AppState,
    cancel: CancellationToken,
}

impl ApiServer {
    /// Create a new API server.
    #[must_use]
    pub const fn new(port: u16, state: AppState, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the API server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ApiServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), ApiServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ApiServerError::ServerFailed(e.to_string()))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

/// API server errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockMarketDataCache, MockQuoteFetcher};
    use crate::application::services::DataMode;

    fn test_state() -> AppState {
        AppState {
            service: Arc::new(StockDataService::new(
                Arc::new(MockQuoteFetcher::new()),
                Arc::new(MockMarketDataCache::new()),
                DataMode::Quote,
            )),
            prediction: PredictionMethod::default(),
            stream: StreamSettings::default(),
        }
    }

    #[tokio::test]
    async fn run_surfaces_a_bind_failure() {
        // Hold the port so the server's own bind collides.
        let holder = TcpListener::bind("0.0.0.0:0").await.unwrap();
        let port = holder.local_addr().unwrap().port();

        let server = ApiServer::new(port, test_state(), CancellationToken::new());
        let err = server.run().await.unwrap_err();
        assert!(matches!(err, ApiServerError::BindFailed(p, _) if p == port));
    }

    #[tokio::test]
    async fn run_stops_when_cancelled() {
        let cancel = CancellationToken::new();
        let server = ApiServer::new(0, test_state(), cancel.clone());

        cancel.cancel();
        server.run().await.unwrap();
    }
}
