//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following the
//! Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`QuoteFetcher`]: Interface for the upstream market-data API
//! - [`MarketDataCache`]: Interface for the TTL response cache

use async_trait::async_trait;

use crate::domain::market_data::{MarketData, PricePoint, Quote};

// =============================================================================
// Fetch Errors
// =============================================================================

/// Classified failure of an upstream fetch.
///
/// Every variant is recovered at the request boundary and mapped to an HTTP
/// status with a JSON error body; none propagate as raw faults.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Requested symbol was empty. Checked before any network call.
    #[error("stock symbol is required")]
    MissingSymbol,

    /// No API key is configured. Checked before any network call.
    #[error("API key is not configured")]
    MissingApiKey,

    /// Upstream reported that the request quota is exhausted.
    #[error("API rate limit reached")]
    RateLimited,

    /// Upstream returned an explicit error message.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Upstream answered but carried no data for the symbol.
    #[error("no data available for symbol {symbol}")]
    NoData {
        /// The symbol that produced an empty response.
        symbol: String,
    },

    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("failed to fetch stock data: {0}")]
    Transport(String),

    /// Upstream payload did not match the expected shape.
    #[error("failed to parse upstream response: {0}")]
    Parse(String),
}

// =============================================================================
// Ports
// =============================================================================

/// Outbound port to the upstream quote API.
///
/// One HTTP GET per call; no retry or backoff. Implementations must
/// classify failures into [`FetchError`] rather than surfacing transport
/// errors raw.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteFetcher: Send + Sync {
    /// Fetch the latest quote snapshot for `symbol`.
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError>;

    /// Fetch the daily closing-price series for `symbol`, oldest first,
    /// truncated to the most recent 30 points.
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Vec<PricePoint>, FetchError>;
}

/// Outbound port to the response cache.
///
/// Entries are trusted only within the implementation's TTL window; a stale
/// entry reads as a miss. `put` unconditionally overwrites.
#[cfg_attr(test, mockall::automock)]
pub trait MarketDataCache: Send + Sync {
    /// Return the cached payload for `symbol` if present and fresh.
    fn get(&self, symbol: &str) -> Option<MarketData>;

    /// Store `data` for `symbol`, stamping the current time.
    fn put(&self, symbol: &str, data: MarketData);
}
