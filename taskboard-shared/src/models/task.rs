/// Task model and database operations
///
/// A task is a to-do item: a description and a completion flag.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     description TEXT NOT NULL CHECK (description <> ''),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, NewTask, TaskChanges};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, NewTask { description: "buy milk".to_string() }).await?;
/// assert!(!task.completed);
///
/// Task::update(&pool, task.id, TaskChanges {
///     description: "buy milk".to_string(),
///     completed: true,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task record
///
/// Serialized with camelCase keys; this is both the HTTP representation and
/// the format of the cached task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// What needs doing (never empty)
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last replaced
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task; new tasks always start incomplete
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    pub description: String,
}

/// Full replacement of a task's mutable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskChanges {
    pub description: String,
    pub completed: bool,
}

impl Task {
    /// Inserts a new task with `completed = false`
    pub async fn create(pool: &PgPool, data: NewTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (description, completed)
            VALUES ($1, FALSE)
            RETURNING id, description, completed, created_at, updated_at
            "#,
        )
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists every task, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, description, completed, created_at, updated_at
            FROM tasks
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Replaces description and completion flag
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task has this ID
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: TaskChanges,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET description = $2, completed = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, description, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.description)
        .bind(changes.completed)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false if the task didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
