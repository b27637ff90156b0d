//! Read-through response cache
//!
//! GET responses on API connections can be served from a cache keyed by
//! account id and request path. Entries expire after a TTL; there is no other
//! invalidation.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Longest key memcached accepts
const MAX_KEY_LENGTH: usize = 250;

/// Storage behind the read-through cache
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

/// Build the cache key for an account and a request path
pub fn cache_key(account_id: &str, path: &str) -> String {
    let key = format!("{}:{}", account_id, path);
    if key.len() <= MAX_KEY_LENGTH && key.chars().all(|c| c.is_ascii_graphic()) {
        key
    } else {
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes()).to_string()
    }
}

/// In-process cache
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| Instant::now() < *expires_at)
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, (_, expires_at)| now < *expires_at);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }
}

/// Memcached-backed cache shared between processes
pub struct MemcachedCache {
    client: Arc<memcache::Client>,
}

impl MemcachedCache {
    /// Connect to a list of `host:port` nodes
    pub async fn connect(nodes: &[String]) -> Result<Self> {
        let urls: Vec<String> = nodes
            .iter()
            .map(|n| {
                if n.starts_with("memcache://") {
                    n.clone()
                } else {
                    format!("memcache://{}", n)
                }
            })
            .collect();

        let client = tokio::task::spawn_blocking(move || memcache::Client::connect(urls))
            .await
            .map_err(|e| Error::Cache(e.to_string()))?
            .map_err(|e| Error::Cache(e.to_string()))?;

        tracing::debug!("Connected to {} memcached node(s)", nodes.len());

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl CacheBackend for MemcachedCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let client = Arc::clone(&self.client);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || client.get::<String>(&key))
            .await
            .map_err(|e| Error::Cache(e.to_string()))?
            .map_err(|e| Error::Cache(e.to_string()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let client = Arc::clone(&self.client);
        let key = key.to_string();
        let value = value.to_string();
        let expiration = u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX);
        tokio::task::spawn_blocking(move || client.set(&key, value.as_str(), expiration))
            .await
            .map_err(|e| Error::Cache(e.to_string()))?
            .map_err(|e| Error::Cache(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_plain() {
        assert_eq!(
            cache_key("acct", "/v1/vpcs?version=2021-01-12"),
            "acct:/v1/vpcs?version=2021-01-12"
        );
    }

    #[test]
    fn test_cache_key_long_paths_are_hashed() {
        let long = format!("/v1/{}", "a".repeat(400));
        let key = cache_key("acct", &long);
        assert!(key.len() <= MAX_KEY_LENGTH);
        assert_eq!(key, cache_key("acct", &long));
        assert_ne!(key, cache_key("other", &long));
    }

    #[tokio::test]
    async fn test_memory_cache_round_trip() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.get("missing").await.unwrap().is_none());
    }

    #[test]
    fn test_memory_cache_expires() {
        let cache = MemoryCache::new();
        tokio_test::block_on(async {
            cache.set("k", "v", Duration::ZERO).await.unwrap();
            assert!(cache.get("k").await.unwrap().is_none());
        });
    }
}
