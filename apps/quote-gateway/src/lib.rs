#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Quote Gateway - Stock Data API
//!
//! An HTTP gateway in front of the Alpha Vantage market-data API. Fetches
//! quotes and daily time series, caches them with a short TTL, serves a
//! simple next-price prediction, and streams simulated price ticks over
//! Server-Sent Events.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure types and prediction heuristics
//!   - `market_data`: Quote, price point and tick types
//!   - `prediction`: Next-price heuristics and accuracy metric
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: Interfaces for the upstream fetcher and the response cache
//!   - `services`: Cache-then-fetch stock data service
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `alphavantage`: HTTP client for the upstream quote API
//!   - `cache`: TTL + LRU bounded in-memory cache
//!   - `http`: Axum API server (predict, stock-data, stock-stream)
//!   - `stream`: Simulated tick source for the SSE endpoint
//!   - `config`: Environment-based configuration
//!   - `telemetry`: Tracing subscriber setup
//!
//! # Data Flow
//!
//! ```text
//! Client ──► /api/stock-data ──► Cache ──miss──► Alpha Vantage
//!                                  ▲                  │
//!                                  └──────store───────┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Pure types and heuristics with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::market_data::{MarketData, PricePoint, Quote, StreamTick};
pub use domain::prediction::{
    PredictionMethod, calculate_accuracy, predict_next_price, threshold_prediction,
};

// Application
pub use application::ports::{FetchError, MarketDataCache, QuoteFetcher};
pub use application::services::{DataMode, StockDataService};

// Infrastructure config
pub use infrastructure::config::{
    AppConfig, CacheSettings, ServerSettings, StreamSettings, UpstreamSettings,
};

// API server (for integration tests)
pub use infrastructure::http::{ApiServer, ApiServerError, AppState, router};

// Upstream client
pub use infrastructure::alphavantage::AlphaVantageClient;

// Cache
pub use infrastructure::cache::TtlCache;

// Telemetry
pub use infrastructure::telemetry::init as init_telemetry;
