/// Database models for Taskboard
///
/// This module contains the database models and their SQL operations.
/// Services never call these directly; they go through the
/// [`repository`](crate::repository) traits.
///
/// # Models
///
/// - `user`: User accounts and the sanitized `UserView`
/// - `task`: To-do items
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{NewTask, Task};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let task = Task::create(&pool, NewTask { description: "buy milk".to_string() }).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
