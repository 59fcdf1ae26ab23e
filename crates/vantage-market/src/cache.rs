//! Caching layer for market data to reduce upstream calls

use cached::{Cached, TimedCache};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for market data requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Stock symbol
    pub symbol: String,
    /// Upstream endpoint or operation type
    pub endpoint: String,
    /// Additional parameters as JSON string
    pub params: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(symbol: impl Into<String>, endpoint: impl Into<String>, params: impl Serialize) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: endpoint.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }
}

/// Thread-safe cache for market data
///
/// Values are stored as JSON so one cache can hold any serializable record.
#[derive(Clone)]
pub struct StockCache {
    cache: Arc<RwLock<TimedCache<CacheKey, Value>>>,
}

impl StockCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<Value> {
        // TimedCache evicts on read, so lookups need the write lock
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: Value) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// If the value exists in cache, it's returned immediately.
    /// Otherwise, the fetcher function is called and a successful result is
    /// cached. Errors pass through and are never stored.
    pub async fn get_or_fetch<T, F, Fut, E>(&self, key: CacheKey, fetcher: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(&key).await {
            match serde_json::from_value(value) {
                Ok(hit) => {
                    tracing::debug!(?key, "Cache hit");
                    return Ok(hit);
                }
                Err(e) => tracing::warn!(?key, error = %e, "Discarding unreadable cache entry"),
            }
        }

        tracing::debug!(?key, "Cache miss");

        let fetched = fetcher().await?;

        match serde_json::to_value(&fetched) {
            Ok(value) => self.insert(key, value).await,
            Err(e) => tracing::warn!(?key, error = %e, "Value not cacheable"),
        }

        Ok(fetched)
    }

    /// Invalidate a specific cache entry
    pub async fn invalidate(&self, key: &CacheKey) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_remove(key);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Two-tier cache: short-lived prices and long-lived fundamentals
#[derive(Clone)]
pub struct CacheManager {
    /// Quotes and price history
    pub realtime: StockCache,
    /// Company fundamentals
    pub fundamental: StockCache,
}

impl CacheManager {
    /// Create a new cache manager with specified TTLs
    pub fn new(realtime_ttl: Duration, fundamental_ttl: Duration) -> Self {
        Self {
            realtime: StockCache::new(realtime_ttl),
            fundamental: StockCache::new(fundamental_ttl),
        }
    }

    /// Create a default cache manager
    pub fn default_config() -> Self {
        Self::new(
            Duration::from_secs(60),   // 1 minute for prices
            Duration::from_secs(3600), // 1 hour for fundamentals
        )
    }

    /// Clear all caches
    pub async fn clear_all(&self) {
        self.realtime.clear().await;
        self.fundamental.clear().await;
    }
}
