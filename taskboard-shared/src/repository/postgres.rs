/// PostgreSQL repositories
///
/// Thin adapters from the repository traits onto the sqlx model operations in
/// [`crate::models`]. Unique constraint violations are surfaced as
/// `RepositoryError::Conflict` so the services can tell a duplicate email from
/// an outage.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, TaskRepository, UserRepository};
use crate::db::pool::health_check;
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Task repository backed by the `tasks` table
#[derive(Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn save(&self, task: NewTask) -> RepositoryResult<Task> {
        Ok(Task::create(&self.pool, task).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Task>> {
        Ok(Task::list_all(&self.pool).await?)
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> RepositoryResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, changes).await?)
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}

/// User repository backed by the `users` table
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: CreateUser) -> RepositoryResult<User> {
        User::create(&self.pool, user).await.map_err(map_constraint_error)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> RepositoryResult<Option<User>> {
        User::update(&self.pool, id, changes)
            .await
            .map_err(map_constraint_error)
    }
}

/// Converts unique constraint violations into `RepositoryError::Conflict`
fn map_constraint_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return RepositoryError::Conflict(constraint);
        }
    }
    RepositoryError::Database(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = map_constraint_error(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::Database(sqlx::Error::RowNotFound)));
    }

    // Tests against a live database are in tests/postgres_repository_tests.rs
}
