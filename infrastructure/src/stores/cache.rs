//! TTL cache for read-only tool results.

use async_trait::async_trait;
use conductor_application::ports::stores::{CacheStore, StoreError};
use conductor_domain::tool::ToolResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::trace;

struct CacheEntry {
    value: ToolResult,
    expires_at: Instant,
}

/// Map-backed cache with per-entry expiry and a size bound.
///
/// Expired entries are dropped lazily on access and on insert. When full,
/// the entry closest to expiry is evicted.
pub struct InMemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl InMemoryCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Live entries, expired ones excluded
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|entry| entry.expires_at > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<ToolResult>, StoreError> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                trace!(key = %key, "Cache entry expired");
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &str, value: ToolResult, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expires_at > now);

        if entries.len() >= self.max_entries
            && !entries.contains_key(key)
            && let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone())
        {
            entries.remove(&oldest);
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(n: i64) -> ToolResult {
        ToolResult::success("core.teams.GET", json!({ "n": n }))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = InMemoryCacheStore::default();
        cache.put("k", result(1), Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(result(1)));
        assert_eq!(cache.get("missing").await.unwrap(), None);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_entries_expire() {
        let cache = InMemoryCacheStore::default();
        cache.put("k", result(1), Duration::from_millis(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_full_cache_evicts_closest_to_expiry() {
        let cache = InMemoryCacheStore::new(2);
        cache.put("short", result(1), Duration::from_secs(10)).await.unwrap();
        cache.put("long", result(2), Duration::from_secs(100)).await.unwrap();
        cache.put("new", result(3), Duration::from_secs(50)).await.unwrap();

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert!(cache.get("long").await.unwrap().is_some());
        assert!(cache.get("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overwrite_does_not_evict() {
        let cache = InMemoryCacheStore::new(2);
        cache.put("a", result(1), Duration::from_secs(10)).await.unwrap();
        cache.put("b", result(2), Duration::from_secs(10)).await.unwrap();
        cache.put("a", result(3), Duration::from_secs(10)).await.unwrap();

        assert_eq!(cache.get("a").await.unwrap(), Some(result(3)));
        assert!(cache.get("b").await.unwrap().is_some());
    }
}
