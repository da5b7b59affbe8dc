//! Alpha Vantage Adapter
//!
//! HTTP client for the Alpha Vantage quote API implementing the
//! [`QuoteFetcher`](crate::application::ports::QuoteFetcher) port.
//!
//! One GET per call, no retry, no backoff; failures are classified into the
//! `FetchError` taxonomy at this boundary and never re-thrown raw.

mod client;
mod messages;

pub use client::AlphaVantageClient;
pub use messages::GlobalQuoteMessage;
