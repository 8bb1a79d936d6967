use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("moka", MemoryCache);

#[derive(Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// 按条目自身的 TTL 过期
struct EntryTtl;

impl Expiry<String, Entry> for EntryTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// 进程内缓存，单实例部署或 Redis 不可用时使用
pub struct MemoryCache {
    inner: Cache<String, Entry>,
    default_ttl: Duration,
}

impl MemoryCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        Ok(Self::with_limits(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_limits(max_capacity: u64, default_ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryTtl)
            .build();

        debug!(
            "Memory cache ready (capacity {}, default TTL {}s)",
            max_capacity, default_ttl_secs
        );
        Self {
            inner,
            default_ttl: Duration::from_secs(default_ttl_secs),
        }
    }
}

#[async_trait]
impl ObjectCache for MemoryCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(entry) => CacheResult::Found(entry.value),
            None => CacheResult::NotFound,
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        // ttl 为 0 时使用默认值
        let ttl = if ttl == 0 {
            self.default_ttl
        } else {
            Duration::from_secs(ttl)
        };
        self.inner.insert(key, Entry { value, ttl }).await;
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

    #[actix_web::test]
    async fn test_insert_get_remove() {
        let cache = MemoryCache::with_limits(100, 60);
        cache
            .insert_raw("account:abc".to_string(), "{}".to_string(), 0)
            .await;
        assert_eq!(
            cache.get_raw("account:abc").await,
            CacheResult::Found("{}".to_string())
        );

        cache.remove("account:abc").await;
        assert_eq!(cache.get_raw("account:abc").await, CacheResult::NotFound);
    }

    #[actix_web::test]
    async fn test_entry_ttl_expires() {
        let cache = MemoryCache::with_limits(100, 60);
        cache
            .insert_raw("short".to_string(), "v".to_string(), 1)
            .await;
        cache
            .insert_raw("long".to_string(), "v".to_string(), 0)
            .await;

        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert_eq!(cache.get_raw("short").await, CacheResult::NotFound);
        assert_eq!(
            cache.get_raw("long").await,
            CacheResult::Found("v".to_string())
        );
    }
}
