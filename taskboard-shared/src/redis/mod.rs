/// Redis integration
///
/// Redis holds the cached task list (`tasks:list`, SETEX with a 60 s TTL).
/// [`RedisClient`] implements the [`Cache`](crate::cache::Cache) trait and is
/// injected into the task service at startup.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::redis::{RedisClient, RedisConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RedisConfig {
///     url: "redis://localhost:6379".to_string(),
///     command_timeout_secs: 10,
/// };
/// let client = RedisClient::new(config).await?;
/// # Ok(())
/// # }
/// ```

pub mod client;

pub use client::{RedisClient, RedisClientError, RedisConfig};
