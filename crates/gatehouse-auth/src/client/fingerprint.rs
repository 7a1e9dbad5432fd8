//! Client fingerprint computation and its memoizing cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::http::{HeaderMap, Method, Version};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use gatehouse_core::config::CacheConfig;

/// Build the composite cache key for one request.
///
/// Every header that feeds the fingerprint is part of the key, so two
/// requests share a cached fingerprint only when they are
/// indistinguishable at the HTTP level.
pub fn fingerprint_key(
    headers: &HeaderMap,
    method: &Method,
    version: Version,
    remote_addr: &str,
) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
    };
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}|{:?}",
        header("user-agent"),
        header("accept"),
        header("accept-encoding"),
        header("accept-language"),
        remote_addr,
        header("x-forwarded-for"),
        header("x-real-ip"),
        method.as_str(),
        version,
    )
}

/// Derive the fingerprint for a composite key.
pub fn compute_fingerprint(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Cache counters for observability endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FingerprintCacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to compute.
    pub misses: u64,
    /// Entries currently cached.
    pub entries: u64,
    /// Approximate bytes held by cached entries.
    pub weighted_size: u64,
}

/// Bounded TTL cache for client fingerprints.
///
/// Purely a latency optimization: eviction or a cold cache changes cost,
/// never the computed fingerprint. Entry cost is approximated as key
/// length plus value length against the configured byte budget.
#[derive(Debug)]
pub struct FingerprintCache {
    cache: Cache<String, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl FingerprintCache {
    /// Create a new cache from configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .weigher(|key: &String, value: &String| {
                (key.len() + value.len()).try_into().unwrap_or(u32::MAX)
            })
            .max_capacity(config.fingerprint_max_bytes)
            .time_to_live(Duration::from_secs(config.fingerprint_ttl_minutes * 60))
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Fingerprint for a composite key, computing and caching on miss.
    pub async fn fingerprint(&self, key: &str) -> String {
        if let Some(cached) = self.cache.get(key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let fingerprint = compute_fingerprint(key);
        self.cache.insert(key.to_string(), fingerprint.clone()).await;
        fingerprint
    }

    /// Current hit/miss and occupancy counters.
    pub fn stats(&self) -> FingerprintCacheStats {
        FingerprintCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
            weighted_size: self.cache.weighted_size(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cache() -> FingerprintCache {
        FingerprintCache::new(&CacheConfig {
            fingerprint_max_bytes: 64 * 1024,
            fingerprint_ttl_minutes: 5,
        })
    }

    #[tokio::test]
    async fn test_hit_and_miss_counters() {
        let cache = cache();
        let first = cache.fingerprint("key-a").await;
        let second = cache.fingerprint("key-a").await;
        let other = cache.fingerprint("key-b").await;

        assert_eq!(first, second);
        assert_ne!(first, other);

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn test_fingerprint_is_deterministic() {
        let cache = cache();
        let direct = compute_fingerprint("key-a");
        assert_eq!(cache.fingerprint("key-a").await, direct);
        assert_eq!(direct.len(), 64);
    }

    #[test]
    fn test_key_includes_method_and_remote() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("curl/8.4.0"));

        let get = fingerprint_key(&headers, &Method::GET, Version::HTTP_11, "10.0.0.1:9000");
        let post = fingerprint_key(&headers, &Method::POST, Version::HTTP_11, "10.0.0.1:9000");
        let elsewhere = fingerprint_key(&headers, &Method::GET, Version::HTTP_11, "10.0.0.2:9000");

        assert_ne!(get, post);
        assert_ne!(get, elsewhere);
        assert!(get.starts_with("curl/8.4.0|"));
    }
}
