//! Alpha Vantage HTTP client.

use async_trait::async_trait;
use serde_json::Value;

use super::messages::{DailyBarMessage, GlobalQuoteMessage, parse_price};
use crate::application::ports::{FetchError, QuoteFetcher};
use crate::domain::market_data::{MAX_SERIES_POINTS, PricePoint, Quote};
use crate::infrastructure::config::UpstreamSettings;

/// Upstream key holding the quote object.
const GLOBAL_QUOTE_KEY: &str = "Global Quote";

/// Upstream key holding the daily series mapping.
const TIME_SERIES_KEY: &str = "Time Series (Daily)";

/// HTTP client for the Alpha Vantage quote API.
///
/// Issues one GET per call with no retry or backoff; the transport timeout
/// from [`UpstreamSettings`] is the only enforcement. The API key is kept
/// optional so its absence can be reported per-request.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl AlphaVantageClient {
    /// Create a new client from upstream settings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(settings: &UpstreamSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    /// Issue one query and classify the payload.
    ///
    /// Classification order: rate-limit notice, explicit error message,
    /// then the payload is handed back for shape-specific parsing.
    async fn query(&self, function: &str, symbol: &str) -> Result<Value, FetchError> {
        if symbol.trim().is_empty() {
            return Err(FetchError::MissingSymbol);
        }

        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("Alpha Vantage API key is not set");
            return Err(FetchError::MissingApiKey);
        };

        tracing::debug!(function, symbol, "Fetching upstream data");

        // reqwest percent-encodes the parameters; a symbol containing `&`
        // or spaces must not split into extra parameters.
        let request = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(&[("function", function), ("symbol", symbol), ("apikey", api_key)]);

        let response = request.send().await.map_err(|e| {
            tracing::error!(function, symbol, error = %e, "Upstream request failed");
            FetchError::Transport(e.to_string())
        })?;

        let payload: Value = response.json().await.map_err(|e| {
            tracing::error!(function, symbol, error = %e, "Upstream body unreadable");
            FetchError::Transport(e.to_string())
        })?;

        // Throttling arrives as a 200 with a notice field, not a 429.
        if payload.get("Information").is_some() || payload.get("Note").is_some() {
            tracing::warn!(function, symbol, "Upstream rate limit reached");
            return Err(FetchError::RateLimited);
        }

        if let Some(message) = payload.get("Error Message").and_then(Value::as_str) {
            return Err(FetchError::Upstream(message.to_string()));
        }

        Ok(payload)
    }
}

#[async_trait]
impl QuoteFetcher for AlphaVantageClient {
    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, FetchError> {
        let payload = self.query("GLOBAL_QUOTE", symbol).await?;

        let quote = payload
            .get(GLOBAL_QUOTE_KEY)
            .and_then(Value::as_object)
            .filter(|obj| !obj.is_empty())
            .ok_or_else(|| FetchError::NoData {
                symbol: symbol.to_string(),
            })?;

        let message: GlobalQuoteMessage = serde_json::from_value(Value::Object(quote.clone()))
            .map_err(|e| FetchError::Parse(e.to_string()))?;

        message.into_quote()
    }

    async fn fetch_daily_series(&self, symbol: &str) -> Result<Vec<PricePoint>, FetchError> {
        let payload = self.query("TIME_SERIES_DAILY", symbol).await?;

        let series = payload
            .get(TIME_SERIES_KEY)
            .and_then(Value::as_object)
            .filter(|obj| !obj.is_empty())
            .ok_or_else(|| FetchError::NoData {
                symbol: symbol.to_string(),
            })?;

        let mut points = Vec::with_capacity(series.len());
        for (date, bar) in series {
            let bar: DailyBarMessage = serde_json::from_value(bar.clone())
                .map_err(|e| FetchError::Parse(format!("{date}: {e}")))?;

            points.push(PricePoint {
                date: date.clone(),
                price: parse_price("4. close", &bar.close)?,
            });
        }

        // Upstream lists newest first; serve oldest first and keep only the
        // most recent 30 calendar dates.
        points.sort_by(|a, b| a.date.cmp(&b.date));
        if points.len() > MAX_SERIES_POINTS {
            points.drain(..points.len() - MAX_SERIES_POINTS);
        }

        Ok(points)
    }
}

// =============================================================================
// Tests
// =============================================================================
