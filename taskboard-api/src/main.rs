//! # Taskboard API Server
//!
//! Task list and account API backed by PostgreSQL, with the task list cached
//! in Redis.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```
//!
//! Set `LOG_FORMAT=json` for JSON log lines.

use std::sync::Arc;

use anyhow::Context;
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    redis::{RedisClient, RedisConfig},
    repository::{PgTaskRepository, PgUserRepository},
    storage::LocalPhotoStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskboard_api=debug,taskboard_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before the log filter is read
    dotenvy::dotenv().ok();
    init_tracing();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Invalid configuration")?;

    let pool = create_pool(
        DatabaseConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await
    .context("Failed to connect to PostgreSQL")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let redis = RedisClient::new(RedisConfig {
        url: config.redis.url.clone(),
        command_timeout_secs: config.redis.command_timeout_secs,
    })
    .await
    .context("Failed to connect to Redis")?;

    let photos = LocalPhotoStore::new(&config.uploads.dir, config.uploads.public_url.clone());
    tracing::info!(dir = %photos.root().display(), "Profile photos stored locally");

    let bind_address = config.bind_address();
    let state = AppState::new(
        Arc::new(PgTaskRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(redis),
        Arc::new(photos),
        config,
    )?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}
