/// Key-value cache abstraction
///
/// The task service only needs three operations from its cache: read a
/// string, write a string with an expiry, and delete a key. This trait is the
/// seam that lets the service run against Redis in production
/// ([`crate::redis::RedisClient`]) and against [`InMemoryCache`] in tests.
///
/// # Example
///
/// ```
/// use taskboard_shared::cache::{Cache, InMemoryCache};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = InMemoryCache::new();
/// cache.set_ex("greeting", "hello", 60).await?;
/// assert_eq!(cache.get("greeting").await?.as_deref(), Some("hello"));
///
/// cache.delete("greeting").await?;
/// assert!(cache.get("greeting").await?.is_none());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

pub mod memory;

pub use memory::InMemoryCache;

/// Cache errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Cache server unreachable
    #[error("Cache connection error: {0}")]
    Connection(String),

    /// Command rejected or timed out
    #[error("Cache command error: {0}")]
    Command(String),
}

/// String cache with per-entry expiry
#[async_trait]
pub trait Cache: Send + Sync {
    /// Reads a key; `None` on miss or expiry
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Writes a key that expires after `ttl_seconds`
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), CacheError>;

    /// Removes a key; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Health check
    async fn ping(&self) -> Result<bool, CacheError> {
        Ok(true)
    }
}
