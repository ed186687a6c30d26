use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use super::{CacheResult, ObjectCache};
use crate::config::CacheConfig;

/// 基于 moka 的进程内缓存，所有条目共用配置中的 TTL
pub struct MokaObjectCache {
    inner: Cache<String, String>,
}

impl MokaObjectCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(max_capacity, ttl_secs = ttl.as_secs(), "Moka cache initialized");
        Self { inner }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_capacity, Duration::from_secs(config.default_ttl))
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_get_remove() {
        let cache = MokaObjectCache::new(100, Duration::from_secs(60));
        assert_eq!(cache.get_raw("user:t").await, CacheResult::NotFound);

        cache.insert_raw("user:t".into(), "{}".into()).await;
        assert_eq!(cache.get_raw("user:t").await, CacheResult::Found("{}".into()));

        cache.remove("user:t").await;
        assert_eq!(cache.get_raw("user:t").await, CacheResult::NotFound);
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let cache = MokaObjectCache::new(100, Duration::from_millis(50));
        cache.insert_raw("k".into(), "v".into()).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }
}
