//! Alpha Vantage Wire Messages
//!
//! Raw response shapes with the upstream's fixed field names. Numeric
//! fields arrive as strings and are coerced during conversion; a malformed
//! or non-finite number propagates as a parse failure rather than silently
//! becoming zero.

use serde::Deserialize;

use crate::application::ports::FetchError;
use crate::domain::market_data::Quote;

/// The `Global Quote` object of a `GLOBAL_QUOTE` response.
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalQuoteMessage {
    /// Upstream field `01. symbol`.
    #[serde(rename = "01. symbol")]
    pub symbol: String,
    /// Upstream field `05. price` (numeric string).
    #[serde(rename = "05. price")]
    pub price: String,
    /// Upstream field `07. latest trading day`.
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: String,
    /// Upstream field `09. change` (numeric string).
    #[serde(rename = "09. change")]
    pub change: String,
    /// Upstream field `10. change percent` (e.g. `"1.2345%"`).
    #[serde(rename = "10. change percent")]
    pub change_percent: String,
}

impl GlobalQuoteMessage {
    /// Convert into the domain [`Quote`], coercing numeric strings.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Parse`] when a numeric field is malformed or
    /// non-finite.
    pub fn into_quote(self) -> Result<Quote, FetchError> {
        Ok(Quote {
            price: parse_price("05. price", &self.price)?,
            change: parse_price("09. change", &self.change)?,
            symbol: self.symbol,
            change_percent: self.change_percent,
            last_updated: self.latest_trading_day,
        })
    }
}

/// One daily record of a `TIME_SERIES_DAILY` response.
#[derive(Debug, Clone, Deserialize)]
pub struct DailyBarMessage {
    /// Upstream field `4. close` (numeric string).
    #[serde(rename = "4. close")]
    pub close: String,
}

/// Coerce an upstream numeric string to a finite f64.
pub(super) fn parse_price(field: &str, raw: &str) -> Result<f64, FetchError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| FetchError::Parse(format!("invalid number in '{field}': {raw:?}")))?;

    if !value.is_finite() {
        return Err(FetchError::Parse(format!(
            "non-finite number in '{field}': {raw:?}"
        )));
    }

    Ok(value)
}
