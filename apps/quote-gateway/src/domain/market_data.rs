//! Market Data Types
//!
//! Core domain types for quotes, historical price points and simulated
//! stream ticks. All types are plain serde structs; construction happens
//! in the upstream adapter, nothing here does I/O.

use rand::Rng;
use serde::{Deserialize, Serialize};

// =============================================================================
// Quote
// =============================================================================

/// A single point-in-time price snapshot for a symbol.
///
/// Immutable once constructed; sourced from the upstream `GLOBAL_QUOTE`
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker symbol, as echoed by the upstream API.
    pub symbol: String,
    /// Latest price.
    pub price: f64,
    /// Absolute change since the previous close.
    pub change: f64,
    /// Percentage change since the previous close, upstream-formatted
    /// (e.g. `"1.2345%"`).
    #[serde(rename = "changePercent")]
    pub change_percent: String,
    /// Latest trading day, upstream-formatted date string.
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

// =============================================================================
// Price Points
// =============================================================================

/// One daily closing price in a historical series.
///
/// Series are ordered chronologically, oldest first, and truncated to the
/// most recent [`MAX_SERIES_POINTS`] entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Calendar date string (`YYYY-MM-DD`).
    pub date: String,
    /// Closing price for that date.
    pub price: f64,
}

/// Maximum number of points kept in a historical series.
pub const MAX_SERIES_POINTS: usize = 30;

// =============================================================================
// Market Data Payload
// =============================================================================

/// Payload served by the stock-data endpoint and held in the cache.
///
/// Serializes untagged: a quote renders as a single object, a series as a
/// bare array of `{date, price}` points, matching the two deployed response
/// shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketData {
    /// A single quote snapshot.
    Quote(Quote),
    /// A historical daily series, oldest first.
    Series(Vec<PricePoint>),
}

// =============================================================================
// Stream Tick
// =============================================================================

/// Lower bound (inclusive) of the synthetic tick price range.
pub const TICK_PRICE_MIN: f64 = 100.0;

/// Upper bound (exclusive) of the synthetic tick price range.
pub const TICK_PRICE_MAX: f64 = 110.0;

/// One synthetic price sample emitted by the streaming endpoint.
///
/// Ephemeral; never persisted and unrelated to real market data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamTick {
    /// Synthetic price in `[100, 110)`.
    pub price: f64,
    /// Epoch milliseconds at emission time.
    pub timestamp: i64,
}

impl StreamTick {
    /// Sample a new tick: an independently random price in `[100, 110)`
    /// stamped with the current wall-clock time.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            price: rand::rng().random_range(TICK_PRICE_MIN..TICK_PRICE_MAX),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
