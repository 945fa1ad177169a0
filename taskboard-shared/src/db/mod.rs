/// PostgreSQL access
///
/// - `pool`: connection pool creation and health checks
/// - `migrations`: embedded schema migrations (`users`, `tasks`)
///
/// Queries themselves live next to the models (`crate::models`).
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

pub mod migrations;
pub mod pool;
