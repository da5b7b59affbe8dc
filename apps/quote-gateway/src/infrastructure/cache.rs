//! Response Cache
//!
//! In-memory cache for upstream responses, keyed by symbol. Entries are
//! trusted for a fixed TTL and the map is bounded by least-recently-used
//! eviction so a long-running process cannot grow without limit.
//!
//! Implements the [`MarketDataCache`] port; handlers receive it as an
//! injected capability so tests can substitute their own.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::application::ports::MarketDataCache;
use crate::domain::market_data::MarketData;
use crate::infrastructure::config::CacheSettings;

/// One cached payload with its store time and recency marker.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: MarketData,
    stored_at: Instant,
    last_used: u64,
}

/// Inner map plus the monotonically increasing use counter.
#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    use_counter: u64,
}

/// TTL-gated, LRU-bounded response cache.
///
/// `get` and `put` take one short lock each; the cache check and an
/// upstream fetch are deliberately not atomic together, so two concurrent
/// misses for one symbol may both fetch. Last write wins.
#[derive(Debug)]
pub struct TtlCache {
    ttl: Duration,
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl TtlCache {
    /// Create an empty cache from settings.
    #[must_use]
    pub fn new(settings: &CacheSettings) -> Self {
        Self {
            ttl: settings.ttl,
            capacity: settings.capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Number of entries currently held, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `data` for `symbol` with an explicit store time.
    fn put_at(&self, symbol: &str, data: MarketData, stored_at: Instant) {
        let mut inner = self.inner.lock();
        inner.use_counter += 1;
        let entry = CacheEntry {
            data,
            stored_at,
            last_used: inner.use_counter,
        };

        if !inner.entries.contains_key(symbol) && inner.entries.len() >= self.capacity {
            evict_least_recently_used(&mut inner.entries);
        }

        inner.entries.insert(symbol.to_string(), entry);
    }
}

impl MarketDataCache for TtlCache {
    fn get(&self, symbol: &str) -> Option<MarketData> {
        let mut inner = self.inner.lock();
        inner.use_counter += 1;
        let use_counter = inner.use_counter;

        let entry = inner.entries.get_mut(symbol)?;
        if entry.stored_at.elapsed() >= self.ttl {
            // Stale entries read as a miss; the next put overwrites them.
            return None;
        }

        entry.last_used = use_counter;
        Some(entry.data.clone())
    }

    fn put(&self, symbol: &str, data: MarketData) {
        self.put_at(symbol, data, Instant::now());
    }
}

/// Drop the entry with the oldest recency marker.
fn evict_least_recently_used(entries: &mut HashMap<String, CacheEntry>) {
    let oldest = entries
        .iter()
        .min_by_key(|(_, entry)| entry.last_used)
        .map(|(symbol, _)| symbol.clone());

    if let Some(symbol) = oldest {
        tracing::debug!(symbol, "Evicting least recently used cache entry");
        entries.remove(&symbol);
    }
}

// =============================================================================
// Tests
// =============================================================================
