/// Configuration management for the API server
///
/// This module loads configuration from environment variables (and a `.env`
/// file when present) into a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 3000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `REDIS_URL`: Redis connection string (required)
/// - `REDIS_COMMAND_TIMEOUT_SECS`: Per-command timeout (default: 10)
/// - `TASKS_CACHE_TTL_SECS`: Lifetime of the cached task list (default: 60)
/// - `PASSWORD_HASH_COST`: Argon2 iterations (default: 3)
/// - `PASSWORD_HASH_MEMORY_KIB`: Argon2 memory (default: 65536)
/// - `JWT_SECRET`: Secret key for access tokens (required, at least 32 characters)
/// - `JWT_REFRESH_SECRET`: Secret key for refresh tokens (default: `JWT_SECRET`)
/// - `JWT_EXPIRES_IN`: Access token lifetime, e.g. `15m`, `24h` (default: 24h)
/// - `JWT_REFRESH_EXPIRES_IN`: Refresh token lifetime (default: 7d)
/// - `UPLOAD_DIR`: Directory for profile photos (default: uploads)
/// - `UPLOAD_PUBLIC_URL`: Base URL photos are served from (default: `http://localhost:<PORT>/uploads`)
/// - `PHOTO_MAX_BYTES`: Largest accepted photo (default: 5242880)
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use taskboard_shared::auth::{jwt::TokenConfig, password::PasswordConfig};
use taskboard_shared::services::photos::DEFAULT_MAX_PHOTO_BYTES;

/// Minimum accepted length of a signing secret
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Redis configuration
    pub redis: RedisConfig,

    /// Task list cache configuration
    pub cache: CacheConfig,

    /// Password hashing configuration
    pub password: PasswordHashConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Profile photo uploads
    pub uploads: UploadConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,

    /// Production mode (adds HSTS)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL
    pub url: String,

    /// Per-command timeout in seconds
    pub command_timeout_secs: u64,
}

/// Task list cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of the cached list in seconds
    pub tasks_ttl_secs: u64,
}

/// Argon2id cost settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordHashConfig {
    /// Iterations
    pub time_cost: u32,

    /// Memory in KiB
    pub memory_kib: u32,
}

/// Profile photo upload configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory photos are written to and served from
    pub dir: String,

    /// Public URL prefix of the served directory
    pub public_url: String,

    /// Largest accepted photo in bytes
    pub max_bytes: usize,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for access tokens
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Secret key for refresh tokens
    pub refresh_secret: String,

    /// Access token lifetime
    pub expires_in: Duration,

    /// Refresh token lifetime
    pub refresh_expires_in: Duration,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    /// - A JWT secret is shorter than 32 characters
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api = ApiConfig {
            host: lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3000)?,
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            production: parse_or(&lookup, "PRODUCTION", false)?,
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
        };

        let redis = RedisConfig {
            url: lookup("REDIS_URL")
                .ok_or_else(|| anyhow::anyhow!("REDIS_URL environment variable is required"))?,
            command_timeout_secs: parse_or(&lookup, "REDIS_COMMAND_TIMEOUT_SECS", 10)?,
        };

        let cache = CacheConfig {
            tasks_ttl_secs: parse_or(&lookup, "TASKS_CACHE_TTL_SECS", 60)?,
        };
        if cache.tasks_ttl_secs == 0 {
            anyhow::bail!("TASKS_CACHE_TTL_SECS must be greater than zero");
        }

        let defaults = PasswordConfig::default();
        let password = PasswordHashConfig {
            time_cost: parse_or(&lookup, "PASSWORD_HASH_COST", defaults.time_cost)?,
            memory_kib: parse_or(&lookup, "PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
        };

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let refresh_secret = lookup("JWT_REFRESH_SECRET").unwrap_or_else(|| secret.clone());
        if refresh_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_REFRESH_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let jwt = JwtConfig {
            secret,
            refresh_secret,
            expires_in: duration_or(&lookup, "JWT_EXPIRES_IN", "24h")?,
            refresh_expires_in: duration_or(&lookup, "JWT_REFRESH_EXPIRES_IN", "7d")?,
        };

        let uploads = UploadConfig {
            dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            public_url: lookup("UPLOAD_PUBLIC_URL")
                .unwrap_or_else(|| format!("http://localhost:{}/uploads", api.port)),
            max_bytes: parse_or(&lookup, "PHOTO_MAX_BYTES", DEFAULT_MAX_PHOTO_BYTES)?,
        };
        if uploads.max_bytes == 0 {
            anyhow::bail!("PHOTO_MAX_BYTES must be greater than zero");
        }

        Ok(Self {
            api,
            database,
            redis,
            cache,
            password,
            jwt,
            uploads,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Signing settings for the auth service
    pub fn token_config(&self) -> anyhow::Result<TokenConfig> {
        let access_ttl = chrono::Duration::from_std(self.jwt.expires_in)
            .context("JWT_EXPIRES_IN is out of range")?;
        let refresh_ttl = chrono::Duration::from_std(self.jwt.refresh_expires_in)
            .context("JWT_REFRESH_EXPIRES_IN is out of range")?;

        Ok(TokenConfig::new(self.jwt.secret.clone())
            .with_refresh_secret(self.jwt.refresh_secret.clone())
            .with_ttls(access_ttl, refresh_ttl))
    }

    /// Hashing cost for the auth service
    pub fn password_config(&self) -> PasswordConfig {
        PasswordConfig {
            time_cost: self.password.time_cost,
            memory_kib: self.password.memory_kib,
            ..PasswordConfig::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn duration_or<F>(lookup: &F, key: &str, default: &str) -> anyhow::Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    humantime::parse_duration(raw.trim())
        .with_context(|| format!("Invalid duration for {}: {:?}", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgresql://localhost/taskboard"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("JWT_SECRET", SECRET),
        ]
    }

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        let mut pairs = required();
        pairs.extend_from_slice(extra);
        pairs
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&required())).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(!config.api.production);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.redis.command_timeout_secs, 10);
        assert_eq!(config.cache.tasks_ttl_secs, 60);
        assert_eq!(config.password.time_cost, 3);
        assert_eq!(config.password.memory_kib, 65536);
        assert_eq!(config.jwt.refresh_secret, SECRET);
        assert_eq!(config.jwt.expires_in, Duration::from_secs(24 * 3600));
        assert_eq!(config.jwt.refresh_expires_in, Duration::from_secs(7 * 24 * 3600));
        assert_eq!(config.uploads.dir, "uploads");
        assert_eq!(config.uploads.public_url, "http://localhost:3000/uploads");
        assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let pairs = with(&[
            ("PORT", "8080"),
            ("CORS_ORIGINS", "https://app.example.com, https://admin.example.com"),
            ("PRODUCTION", "true"),
            ("TASKS_CACHE_TTL_SECS", "30"),
            ("PASSWORD_HASH_COST", "4"),
            ("JWT_REFRESH_SECRET", "another-refresh-secret-32-bytes-long!"),
            ("JWT_EXPIRES_IN", "15m"),
            ("JWT_REFRESH_EXPIRES_IN", "30d"),
            ("UPLOAD_PUBLIC_URL", "https://cdn.example.com/photos"),
            ("PHOTO_MAX_BYTES", "1024"),
        ]);
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.api.port, 8080);
        assert_eq!(
            config.api.cors_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
        assert!(config.api.production);
        assert_eq!(config.cache.tasks_ttl_secs, 30);
        assert_eq!(config.password_config().time_cost, 4);
        assert_eq!(config.jwt.expires_in, Duration::from_secs(15 * 60));
        assert_eq!(config.uploads.public_url, "https://cdn.example.com/photos");
        assert_eq!(config.uploads.max_bytes, 1024);

        let tokens = config.token_config().unwrap();
        assert_eq!(tokens.access_ttl, chrono::Duration::minutes(15));
        assert_eq!(tokens.refresh_ttl, chrono::Duration::days(30));
        assert_eq!(tokens.refresh_secret, "another-refresh-secret-32-bytes-long!");
    }

    #[test]
    fn test_missing_required_values() {
        for key in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
            let pairs: Vec<_> = required().into_iter().filter(|(k, _)| *k != key).collect();
            let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(err.to_string().contains(key), "{}", err);
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        let pairs = vec![
            ("DATABASE_URL", "postgresql://localhost/taskboard"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("JWT_SECRET", "too-short"),
        ];
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());

        let pairs = with(&[("JWT_REFRESH_SECRET", "short")]);
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Config::from_lookup(lookup_from(&with(&[("PORT", "http")]))).is_err());
        assert!(Config::from_lookup(lookup_from(&with(&[("JWT_EXPIRES_IN", "soon")]))).is_err());
        assert!(Config::from_lookup(lookup_from(&with(&[("TASKS_CACHE_TTL_SECS", "0")]))).is_err());
        assert!(Config::from_lookup(lookup_from(&with(&[("PHOTO_MAX_BYTES", "0")]))).is_err());
    }
}
