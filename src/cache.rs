use chrono::{DateTime, Utc};
use moka::future::Cache;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Source of the current time for staleness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub cached_at: DateTime<Utc>,
    pub value: Value,
}

/// In-process response cache keyed by endpoint-specific strings.
///
/// Freshness is decided when an entry is read: anything whose age has reached
/// the TTL is reported as absent. The moka TTL only reclaims memory for keys
/// that are never asked for again.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self::with_clock(max_capacity, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(max_capacity: u64, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { entries, ttl, clock }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let entry = self.entries.get(key).await?;

        // A clock that moved backwards leaves the entry fresh.
        let fresh = match self.clock.now().signed_duration_since(entry.cached_at).to_std() {
            Ok(age) => age < self.ttl,
            Err(_) => true,
        };

        if fresh {
            tracing::info!("Serving '{}' from cache", key);
            Some(entry.value)
        } else {
            tracing::debug!("Cache entry '{}' is stale", key);
            self.entries.invalidate(key).await;
            None
        }
    }

    pub async fn set(&self, key: &str, value: Value) {
        let entry = CacheEntry {
            cached_at: self.clock.now(),
            value,
        };
        self.entries.insert(key.to_string(), entry).await;
        tracing::info!("Stored '{}' in cache", key);
    }
}
