//! API handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiError;
use crate::application::ports::FetchError;
use crate::infrastructure::stream::tick_stream_from_settings;

// =============================================================================
// Predict
// =============================================================================

/// Predict request body.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    /// Comma-separated list of historical prices.
    pub prompt: String,
}

/// Predict response body.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    /// Predicted next price, fixed to two decimals.
    pub prediction: String,
}

/// `POST /api/predict`
///
/// The body is extracted by hand so that a missing or mistyped `prompt`
/// still answers with the JSON `{ error }` contract instead of the
/// extractor's plain-text rejection.
pub(super) async fn predict(
    State(state): State<AppState>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = request.map_err(|rejection| ApiError::InvalidPrompt(rejection.body_text()))?;
    let prices = parse_price_list(&request.prompt)?;
    let prediction = state.prediction.predict(&prices);

    Ok(Json(PredictResponse {
        prediction: format!("{prediction:.2}"),
    }))
}

/// Parse the comma-separated prompt into at least two finite numbers.
fn parse_price_list(prompt: &str) -> Result<Vec<f64>, ApiError> {
    let invalid =
        || ApiError::InvalidPrompt("Invalid input: Need at least 2 valid numbers".to_string());

    let prices = prompt
        .split(',')
        .map(|token| token.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|_| invalid())?;

    // "NaN" and "inf" parse successfully; they are not valid prices.
    if prices.len() < 2 || prices.iter().any(|p| !p.is_finite()) {
        return Err(invalid());
    }

    Ok(prices)
}

// =============================================================================
// Stock Data
// =============================================================================

/// Stock-data query string.
#[derive(Debug, Deserialize)]
pub(super) struct StockDataQuery {
    symbol: Option<String>,
}

/// `GET /api/stock-data?symbol=S`
pub(super) async fn stock_data(
    State(state): State<AppState>,
    Query(query): Query<StockDataQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let symbol = query
        .symbol
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(FetchError::MissingSymbol)?;

    let data = state.service.stock_data(symbol).await?;
    Ok(Json(data))
}

// =============================================================================
// Stock Stream
// =============================================================================

/// `GET /api/stock-stream`
///
/// One JSON tick per second as an SSE event frame until the client
/// disconnects or the server-side duration cap closes the stream. A tick
/// that fails to serialize ends the stream rather than emitting a
/// malformed frame.
pub(super) async fn stock_stream(State(state): State<AppState>) -> impl IntoResponse {
    let events =
        tick_stream_from_settings(&state.stream).map(|tick| Event::default().json_data(&tick));

    (
        [(header::CACHE_CONTROL, "no-cache, no-transform")],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
}

// =============================================================================
// Liveness
// =============================================================================

/// `GET /healthz`
pub(super) async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// =============================================================================
// Tests
// =============================================================================
