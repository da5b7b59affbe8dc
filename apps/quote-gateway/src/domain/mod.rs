//! Domain Layer - Core market data types and heuristics.
//!
//! This layer contains the core domain types and the prediction math
//! with no external dependencies beyond serialization support.

/// Market data types (quotes, price points, stream ticks).
pub mod market_data;

/// Next-price prediction heuristics and the accuracy metric.
pub mod prediction;
