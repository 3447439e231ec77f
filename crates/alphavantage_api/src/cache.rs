use crate::CustomError;
use log::debug;
use moka::notification::RemovalCause;
use redis::AsyncCommands;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Storage for fetched payloads, keyed by the query they answer.
#[allow(async_fn_in_trait)]
pub trait QueryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CustomError>;
    async fn put(&self, key: &str, payload: &str) -> Result<(), CustomError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub capacity: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy {
            ttl: Duration::from_secs(3600),
            capacity: 64,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expirations: AtomicU64,
}

/// In-process cache on top of `moka`. Entries live for `policy.ttl` and the
/// cache holds at most `policy.capacity` payloads.
pub struct MemoryCache {
    policy: CachePolicy,
    cache: moka::sync::Cache<String, String>,
    counters: Arc<Counters>,
}

impl MemoryCache {
    pub fn new(policy: CachePolicy) -> Self {
        let counters = Arc::new(Counters::default());
        let listener_counters = counters.clone();

        let cache = moka::sync::Cache::builder()
            .max_capacity(policy.capacity as u64)
            .time_to_live(policy.ttl)
            .eviction_listener(move |key: Arc<String>, _payload, cause| match cause {
                RemovalCause::Size => {
                    debug!("eviction_listener | evicted | key: {}", key);
                    listener_counters.evictions.fetch_add(1, Ordering::Relaxed);
                }
                RemovalCause::Expired => {
                    debug!("eviction_listener | expired | key: {}", key);
                    listener_counters.expirations.fetch_add(1, Ordering::Relaxed);
                }
                _ => {}
            })
            .build();

        MemoryCache {
            policy,
            cache,
            counters,
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.run_pending_tasks();
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
            expirations: self.counters.expirations.load(Ordering::Relaxed),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.run_pending_tasks();
        self.cache.entry_count() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks();
    }
}

impl QueryCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CustomError> {
        let cached = self.cache.get(key);
        match cached {
            Some(_) => self.counters.hits.fetch_add(1, Ordering::Relaxed),
            None => self.counters.misses.fetch_add(1, Ordering::Relaxed),
        };
        Ok(cached)
    }

    async fn put(&self, key: &str, payload: &str) -> Result<(), CustomError> {
        self.cache.insert(key.to_string(), payload.to_string());
        // apply the capacity bound now rather than on a later read
        self.cache.run_pending_tasks();
        Ok(())
    }
}

const REDIS_KEY_PREFIX: &str = "alphavantage:";

/// Payloads kept in redis with `SET .. EX ttl`.
pub struct RedisCache {
    client: redis::Client,
    ttl: Duration,
}

impl RedisCache {
    pub fn new(client: redis::Client, ttl: Duration) -> Self {
        RedisCache { client, ttl }
    }

    fn redis_key(key: &str) -> String {
        format!("{}{}", REDIS_KEY_PREFIX, key)
    }
}

impl QueryCache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CustomError> {
        let mut redis_con = self.client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = redis_con.get(Self::redis_key(key)).await?;
        Ok(cached)
    }

    async fn put(&self, key: &str, payload: &str) -> Result<(), CustomError> {
        let mut redis_con = self.client.get_multiplexed_async_connection().await?;
        let _: () = redis_con
            .set_ex(Self::redis_key(key), payload, self.ttl.as_secs().max(1))
            .await?;
        Ok(())
    }
}

/// The cache picked at startup.
pub enum CacheBackend {
    Memory(MemoryCache),
    Redis(RedisCache),
}

impl QueryCache for CacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CustomError> {
        match self {
            CacheBackend::Memory(cache) => cache.get(key).await,
            CacheBackend::Redis(cache) => cache.get(key).await,
        }
    }

    async fn put(&self, key: &str, payload: &str) -> Result<(), CustomError> {
        match self {
            CacheBackend::Memory(cache) => cache.put(key, payload).await,
            CacheBackend::Redis(cache) => cache.put(key, payload).await,
        }
    }
}
