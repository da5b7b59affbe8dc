//! Gateway Configuration Settings
//!
//! Configuration types for the gateway, loaded from environment variables.
//! Every setting has a typed default; only the upstream API key is truly
//! external, and its absence is surfaced per-request rather than at startup
//! so the prediction and stream endpoints keep working without it.

use std::time::Duration;

use crate::application::services::DataMode;
use crate::domain::prediction::PredictionMethod;

/// Server settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// HTTP listen port.
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Upstream market-data API settings.
#[derive(Clone)]
pub struct UpstreamSettings {
    /// API key for the upstream quote service. `None` degrades the
    /// stock-data endpoint to a uniform 500.
    pub api_key: Option<String>,
    /// Base URL of the upstream service.
    pub base_url: String,
    /// Transport timeout for upstream calls. The only timeout enforced;
    /// there is no retry or backoff.
    pub timeout: Duration,
    /// Which response shape the stock-data endpoint serves.
    pub mode: DataMode,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.alphavantage.co".to_string(),
            timeout: Duration::from_secs(10),
            mode: DataMode::Quote,
        }
    }
}

impl std::fmt::Debug for UpstreamSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamSettings")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Response cache settings.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    /// How long a cached entry stays trusted.
    pub ttl: Duration,
    /// Maximum number of symbols kept; least-recently-used entries are
    /// evicted beyond this bound.
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            capacity: 256,
        }
    }
}

/// Simulated stream settings.
#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Interval between synthetic ticks.
    pub tick_interval: Duration,
    /// Server-side cap on stream duration; `None` streams until the client
    /// disconnects.
    pub max_duration: Option<Duration>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            max_duration: Some(Duration::from_secs(300)),
        }
    }
}

/// Complete gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Server settings.
    pub server: ServerSettings,
    /// Upstream API settings.
    pub upstream: UpstreamSettings,
    /// Response cache settings.
    pub cache: CacheSettings,
    /// Simulated stream settings.
    pub stream: StreamSettings,
    /// Heuristic served by the predict endpoint.
    pub prediction: PredictionMethod,
}

impl AppConfig {
    /// Create configuration from environment variables, falling back to
    /// defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var("ALPHA_VANTAGE_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let server = ServerSettings {
            port: parse_env_u16("QUOTE_GATEWAY_PORT", ServerSettings::default().port),
        };

        let upstream = UpstreamSettings {
            api_key,
            base_url: std::env::var("QUOTE_GATEWAY_UPSTREAM_URL")
                .unwrap_or_else(|_| UpstreamSettings::default().base_url),
            timeout: parse_env_duration_secs(
                "QUOTE_GATEWAY_UPSTREAM_TIMEOUT_SECS",
                UpstreamSettings::default().timeout,
            ),
            mode: std::env::var("QUOTE_GATEWAY_DATA_MODE")
                .map(|s| DataMode::from_str_case_insensitive(&s))
                .unwrap_or_default(),
        };

        let cache = CacheSettings {
            ttl: parse_env_duration_secs(
                "QUOTE_GATEWAY_CACHE_TTL_SECS",
                CacheSettings::default().ttl,
            ),
            capacity: parse_env_usize(
                "QUOTE_GATEWAY_CACHE_CAPACITY",
                CacheSettings::default().capacity,
            ),
        };

        let stream = StreamSettings {
            tick_interval: parse_env_duration_millis(
                "QUOTE_GATEWAY_STREAM_INTERVAL_MS",
                StreamSettings::default().tick_interval,
            ),
            // 0 means unbounded; the default caps a stream at 5 minutes.
            max_duration: match std::env::var("QUOTE_GATEWAY_STREAM_MAX_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
            {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => StreamSettings::default().max_duration,
            },
        };

        let prediction = std::env::var("QUOTE_GATEWAY_PREDICTION")
            .map(|s| PredictionMethod::from_str_case_insensitive(&s))
            .unwrap_or_default();

        Self {
            server,
            upstream,
            cache,
            stream,
            prediction,
        }
    }
}

fn parse_env_u16(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_env_duration_secs(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_secs)
}

fn parse_env_duration_millis(key: &str, default: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map_or(default, Duration::from_millis)
}
