/// In-memory repositories
///
/// Mutex-guarded collections implementing the repository traits. They honor
/// the same contracts as the PostgreSQL adapters (email uniqueness, ordering,
/// `Option`/`bool` results for missing rows) and are used by the test suites
/// and for running the API without a database.
///
/// `InMemoryTaskRepository` counts `find_all` calls so cache behaviour can be
/// asserted from the outside.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{RepositoryError, RepositoryResult, TaskRepository, UserRepository};
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, User};

fn lock<T>(mutex: &Mutex<T>) -> RepositoryResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Storage("lock poisoned".to_string()))
}

/// Task repository over a `Vec`, kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
    find_all_calls: AtomicUsize,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `find_all` has hit this store
    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn save(&self, task: NewTask) -> RepositoryResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            description: task.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        lock(&self.tasks)?.push(task.clone());
        Ok(task)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Task>> {
        Ok(lock(&self.tasks)?.iter().find(|t| t.id == id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Task>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.tasks)?.clone())
    }

    async fn update(&self, id: Uuid, changes: TaskChanges) -> RepositoryResult<Option<Task>> {
        let mut tasks = lock(&self.tasks)?;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        task.description = changes.description;
        task.completed = changes.completed;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> RepositoryResult<bool> {
        let mut tasks = lock(&self.tasks)?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() < before)
    }
}

/// User repository over a `HashMap` keyed by ID
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user, simulating deletion behind the API's back
    pub fn remove(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(lock(&self.users)?.remove(&id).is_some())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: CreateUser) -> RepositoryResult<User> {
        let email = normalize_email(&user.email);
        let mut users = lock(&self.users)?;

        if users.values().any(|u| u.email == email) {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            photo_url: user.photo_url,
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(lock(&self.users)?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let email = normalize_email(email);
        Ok(lock(&self.users)?
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> RepositoryResult<Option<User>> {
        let mut users = lock(&self.users)?;

        if let Some(ref email) = changes.email {
            let email = normalize_email(email);
            if users.values().any(|u| u.id != id && u.email == email) {
                return Err(RepositoryError::Conflict("users_email_key".to_string()));
            }
        }

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = normalize_email(&email);
        }
        if let Some(photo_url) = changes.photo_url {
            user.photo_url = photo_url;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }
}
