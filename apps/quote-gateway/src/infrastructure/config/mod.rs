//! Configuration Module
//!
//! Configuration loading and dependency wiring for the gateway service.

mod settings;

pub use settings::{
    AppConfig, CacheSettings, ServerSettings, StreamSettings, UpstreamSettings,
};
