/// In-process cache with expiry
///
/// Entries carry a deadline measured on the tokio clock, so tests can use
/// `tokio::time::pause()` / `advance()` to expire them deterministically.
/// Expired entries are evicted lazily on read.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{Cache, CacheError};

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Mutex-guarded map implementing [`Cache`]
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a live (unexpired) entry exists for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .get(key)
                    .is_some_and(|e| e.expires_at > Instant::now())
            })
            .unwrap_or(false)
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, CacheError> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Command("cache lock poisoned".to_string()))
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries()?;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError> {
        if ttl_seconds == 0 {
            return Err(CacheError::Command("invalid expire time in 'setex' command".to_string()));
        }

        self.entries()?.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_delete() {
        let cache = InMemoryCache::new();
        assert!(cache.get("k").await.unwrap().is_none());

        cache.set_ex("k", "v", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.contains_key("k"));

        cache.delete("k").await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());

        // Deleting a missing key is fine
        cache.delete("k").await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires() {
        let cache = InMemoryCache::new();
        cache.set_ex("k", "v", 60).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(cache.get("k").await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("k").await.unwrap().is_none());
        assert!(!cache.contains_key("k"));
    }

    #[tokio::test]
    async fn test_zero_ttl_rejected() {
        let cache = InMemoryCache::new();
        assert!(cache.set_ex("k", "v", 0).await.is_err());
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_value() {
        let cache = InMemoryCache::new();
        cache.set_ex("k", "old", 60).await.unwrap();
        cache.set_ex("k", "new", 60).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("new"));
    }
}
