/// Storage interfaces for tasks and users
///
/// Services depend on these traits rather than on a concrete database, so the
/// same logic runs against PostgreSQL in production and against in-memory
/// maps in tests.
///
/// # Implementations
///
/// - [`postgres`]: `PgTaskRepository`, `PgUserRepository` (sqlx)
/// - [`memory`]: `InMemoryTaskRepository`, `InMemoryUserRepository`
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::repository::{memory::InMemoryTaskRepository, TaskRepository};
/// use taskboard_shared::models::task::NewTask;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repo: Arc<dyn TaskRepository> = Arc::new(InMemoryTaskRepository::new());
/// let task = repo.save(NewTask { description: "buy milk".to_string() }).await?;
/// assert_eq!(repo.find_by_id(task.id).await?, Some(task));
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::task::{NewTask, Task, TaskChanges};
use crate::models::user::{CreateUser, UpdateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryTaskRepository, InMemoryUserRepository};
pub use postgres::{PgTaskRepository, PgUserRepository};

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A uniqueness constraint rejected the write
    #[error("Constraint violation: {0}")]
    Conflict(String),

    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Non-database storage failure (e.g. poisoned lock in the in-memory store)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Repository result type alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Task storage
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persists a new task (always incomplete) and returns the stored record
    async fn save(&self, task: NewTask) -> RepositoryResult<Task>;

    /// Gets a task by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Task>>;

    /// Gets all tasks, oldest first
    async fn find_all(&self) -> RepositoryResult<Vec<Task>>;

    /// Replaces both mutable fields; None if the task does not exist
    async fn update(&self, id: Uuid, changes: TaskChanges) -> RepositoryResult<Option<Task>>;

    /// Deletes a task; false if it did not exist
    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<bool>;

    /// Verifies the backing store is reachable
    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}

/// User storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user; a taken email yields `RepositoryError::Conflict`
    async fn create(&self, user: CreateUser) -> RepositoryResult<User>;

    /// Gets a user by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>>;

    /// Gets a user by (normalized) email
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;

    /// Applies a partial update; None if the user does not exist
    async fn update(&self, id: Uuid, changes: UpdateUser) -> RepositoryResult<Option<User>>;
}
