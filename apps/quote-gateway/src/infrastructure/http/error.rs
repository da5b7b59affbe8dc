//! API error mapping.
//!
//! One error type covers the whole HTTP boundary; each variant carries
//! enough to choose a status code and render the `{ error, details? }` body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::ports::FetchError;

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The predict request body did not contain enough parseable numbers.
    #[error("{0}")]
    InvalidPrompt(String),

    /// A classified upstream failure from the stock-data path.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ApiError {
    /// Status and body parts for this error.
    fn parts(&self) -> (StatusCode, String, Option<String>) {
        match self {
            Self::InvalidPrompt(message) => {
                (StatusCode::BAD_REQUEST, message.clone(), None)
            }
            Self::Fetch(fetch) => match fetch {
                FetchError::MissingSymbol => (
                    StatusCode::BAD_REQUEST,
                    "Stock symbol is required".to_string(),
                    None,
                ),
                FetchError::MissingApiKey => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "API key is not configured".to_string(),
                    None,
                ),
                FetchError::RateLimited => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "API rate limit reached. Please try again later.".to_string(),
                    None,
                ),
                FetchError::NoData { .. } => (
                    StatusCode::NOT_FOUND,
                    "No data available for the given symbol".to_string(),
                    None,
                ),
                FetchError::Upstream(details)
                | FetchError::Transport(details)
                | FetchError::Parse(details) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch stock data".to_string(),
                    Some(details.clone()),
                ),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = self.parts();

        if status.is_server_error() {
            tracing::error!(%status, error, ?details, "Request failed");
        } else {
            tracing::debug!(%status, error, "Request rejected");
        }

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

// =============================================================================
// Tests
// =============================================================================
