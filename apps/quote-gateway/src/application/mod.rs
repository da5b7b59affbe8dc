//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the stock-data use case and the port interfaces
//! that define how it reaches the upstream API and the response cache.

/// Port interfaces for the upstream fetcher and the response cache.
pub mod ports;

/// Application services orchestrating cache and fetch.
pub mod services;
