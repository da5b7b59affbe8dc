//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Alpha Vantage HTTP client adapter.
pub mod alphavantage;

/// TTL + LRU bounded in-memory response cache.
pub mod cache;

/// Configuration loading from environment variables.
pub mod config;

/// Axum API server (predict, stock-data, stock-stream, healthz).
pub mod http;

/// Simulated tick source for the SSE endpoint.
pub mod stream;

/// Tracing subscriber setup.
pub mod telemetry;
