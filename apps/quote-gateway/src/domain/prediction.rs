//! Prediction Heuristics
//!
//! Two accepted next-price heuristics plus an auxiliary accuracy metric.
//! Both formulas exist in the deployed system; they are kept side by side
//! as pure functions and the serving formula is picked by configuration
//! rather than duplicated at call sites.

// =============================================================================
// Heuristics
// =============================================================================

/// Window size for the moving-average-plus-trend heuristic.
pub const TREND_WINDOW: usize = 10;

/// Moving-average-plus-trend prediction.
///
/// Takes the last `min(10, len)` prices, averages them, and adds a trend
/// term of `(last − first) / window_len`. With a single price the trend is
/// zero and the prediction equals that price. An empty slice yields NaN
/// (0/0), mirroring the source arithmetic; callers validate length first.
#[must_use]
pub fn predict_next_price(prices: &[f64]) -> f64 {
    let window_size = TREND_WINDOW.min(prices.len());
    let window = &prices[prices.len() - window_size..];

    #[allow(clippy::cast_precision_loss)]
    let divisor = window_size as f64;
    let avg = window.iter().sum::<f64>() / divisor;

    let trend = match (window.first(), window.last()) {
        (Some(first), Some(last)) => (last - first) / divisor,
        _ => f64::NAN,
    };

    avg + trend
}

/// Last-versus-mean threshold prediction.
///
/// Compares the last price to the mean of the whole input: above the mean
/// predicts `last × 1.01`, otherwise `last × 0.99`. Empty input yields NaN.
#[must_use]
pub fn threshold_prediction(prices: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let avg = prices.iter().sum::<f64>() / prices.len() as f64;
    let last = prices.last().copied().unwrap_or(f64::NAN);

    if last > avg { last * 1.01 } else { last * 0.99 }
}

/// Which heuristic the predict endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionMethod {
    /// Last-versus-mean threshold formula (the original endpoint behavior).
    #[default]
    Threshold,
    /// Moving-average-plus-trend formula.
    Trend,
}

impl PredictionMethod {
    /// Parse a method name from configuration.
    #[must_use]
    pub fn from_str_case_insensitive(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trend" => Self::Trend,
            _ => Self::Threshold,
        }
    }

    /// Get the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Threshold => "threshold",
            Self::Trend => "trend",
        }
    }

    /// Apply the selected heuristic.
    #[must_use]
    pub fn predict(&self, prices: &[f64]) -> f64 {
        match self {
            Self::Threshold => threshold_prediction(prices),
            Self::Trend => predict_next_price(prices),
        }
    }
}

// =============================================================================
// Accuracy Metric
// =============================================================================

/// Mean absolute error normalized by the actual range, reported as
/// `100 − normalized_error` and clamped to `[0, 100]`.
///
/// Identical sequences score exactly 100. A constant actual sequence has
/// zero range and yields NaN; callers feed nonconstant actuals.
#[must_use]
pub fn calculate_accuracy(actual: &[f64], predicted: &[f64]) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let mean_error = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64;

    let range = actual.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        - actual.iter().copied().fold(f64::INFINITY, f64::min);

    (100.0 - (mean_error / range) * 100.0).clamp(0.0, 100.0)
}

// =============================================================================
// Tests
// =============================================================================
