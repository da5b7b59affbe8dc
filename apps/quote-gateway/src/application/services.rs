//! Application Services
//!
//! The stock-data use case: check the cache, fetch from upstream on a miss,
//! store the result. Upstream failures propagate without touching the cache.

use std::sync::Arc;

use crate::application::ports::{FetchError, MarketDataCache, QuoteFetcher};
use crate::domain::market_data::MarketData;

// =============================================================================
// Data Mode
// =============================================================================

/// Which upstream shape the stock-data endpoint serves.
///
/// The deployed system exists in two variants, one returning a single quote
/// object and one returning a 30-point daily series. Both are implemented
/// and the variant is picked by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// Serve a single `GLOBAL_QUOTE` snapshot.
    #[default]
    Quote,
    /// Serve the `TIME_SERIES_DAILY` closing prices.
    Series,
}

impl DataMode {
    /// Parse a mode name from configuration.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "series" => Self::Series,
            _ => Self::Quote,
        }
    }

    /// Get the mode name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Series => "series",
        }
    }
}

// =============================================================================
// Stock Data Service
// =============================================================================

/// Cache-then-fetch service behind the stock-data endpoint.
///
/// The cache check and the upstream fetch are not atomic together:
/// concurrent misses for one symbol may each fetch, and the last write
/// wins. That duplicates an upstream call but corrupts nothing.
pub struct StockDataService {
    fetcher: Arc<dyn QuoteFetcher>,
    cache: Arc<dyn MarketDataCache>,
    mode: DataMode,
}

impl StockDataService {
    /// Create a new service over the given ports.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        cache: Arc<dyn MarketDataCache>,
        mode: DataMode,
    ) -> Self {
        Self {
            fetcher,
            cache,
            mode,
        }
    }

    /// Get market data for `symbol`, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the classified [`FetchError`] from the upstream client on a
    /// miss that fails; the cache is only written on success.
    pub async fn stock_data(&self, symbol: &str) -> Result<MarketData, FetchError> {
        if let Some(data) = self.cache.get(symbol) {
            tracing::debug!(symbol, "Serving cached data");
            return Ok(data);
        }

        let data = match self.mode {
            DataMode::Quote => MarketData::Quote(self.fetcher.fetch_quote(symbol).await?),
            DataMode::Series => MarketData::Series(self.fetcher.fetch_daily_series(symbol).await?),
        };

        self.cache.put(symbol, data.clone());
        tracing::debug!(symbol, mode = self.mode.as_str(), "Fetched and cached");
        Ok(data)
    }
}

// =============================================================================
// Tests
// =============================================================================
