/// Task service with a cache-aside task list
///
/// The full task list is cached under [`TASK_LIST_CACHE_KEY`] as a JSON array
/// with a short TTL. Reads try the cache first and fall back to the
/// repository on a miss, repopulating the entry. Every successful write
/// (create, update, delete) deletes the key so the next read rebuilds it.
///
/// Cache failures are not swallowed: a failed GET/SETEX/DEL surfaces as
/// `ServiceError::Internal`. Concurrent misses may each read the store and
/// write the entry; the last writer wins.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::cache::InMemoryCache;
/// use taskboard_shared::repository::InMemoryTaskRepository;
/// use taskboard_shared::services::tasks::TaskService;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = TaskService::new(
///     Arc::new(InMemoryTaskRepository::new()),
///     Arc::new(InMemoryCache::new()),
/// );
///
/// let task = service.create(Some("write report")).await?;
/// assert!(!task.completed);
/// assert_eq!(service.list().await?, vec![task]);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use uuid::Uuid;

use crate::cache::Cache;
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::repository::TaskRepository;

/// Cache key holding the serialized task list
pub const TASK_LIST_CACHE_KEY: &str = "tasks:list";

/// Default lifetime of the cached list
pub const DEFAULT_LIST_TTL_SECS: u64 = 60;

const DESCRIPTION_REQUIRED: &str = "Descrição obrigatória";
const UPDATE_FIELDS_REQUIRED: &str = "Descrição e status são obrigatórios";
const TASK_NOT_FOUND: &str = "Tarefa não encontrada";

/// Reachability of the service's backing stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyHealth {
    pub database: bool,
    pub cache: bool,
}

impl DependencyHealth {
    pub fn is_healthy(&self) -> bool {
        self.database && self.cache
    }
}

/// Task CRUD on top of a repository and a cache
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    cache: Arc<dyn Cache>,
    list_ttl_secs: u64,
}

impl TaskService {
    /// Creates a service with the default list TTL
    pub fn new(repo: Arc<dyn TaskRepository>, cache: Arc<dyn Cache>) -> Self {
        Self {
            repo,
            cache,
            list_ttl_secs: DEFAULT_LIST_TTL_SECS,
        }
    }

    /// Overrides the list TTL
    pub fn with_list_ttl(mut self, ttl_secs: u64) -> Self {
        self.list_ttl_secs = ttl_secs;
        self
    }

    /// Lists all tasks, served from the cache when possible
    pub async fn list(&self) -> ServiceResult<Vec<Task>> {
        if let Some(cached) = self.cache.get(TASK_LIST_CACHE_KEY).await? {
            let tasks: Vec<Task> = serde_json::from_str(&cached)?;
            tracing::debug!(count = tasks.len(), "Task list cache hit");
            return Ok(tasks);
        }

        tracing::debug!("Task list cache miss");
        let tasks = self.repo.find_all().await?;

        let serialized = serde_json::to_string(&tasks)?;
        self.cache
            .set_ex(TASK_LIST_CACHE_KEY, &serialized, self.list_ttl_secs)
            .await?;

        Ok(tasks)
    }

    /// Creates an incomplete task
    ///
    /// # Errors
    ///
    /// `Validation` when the description is absent or blank.
    pub async fn create(&self, description: Option<&str>) -> ServiceResult<Task> {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ServiceError::Validation(DESCRIPTION_REQUIRED.to_string()))?;

        let task = self
            .repo
            .save(NewTask {
                description: description.to_string(),
            })
            .await?;

        self.invalidate_list().await?;
        tracing::info!(task_id = %task.id, "Task created");

        Ok(task)
    }

    /// Gets a single task (never cached)
    pub async fn get(&self, id: &str) -> ServiceResult<Task> {
        let id = parse_task_id(id)?;

        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)
    }

    /// Replaces a task's description and completion flag
    ///
    /// Both fields are required; the body is validated before the task is
    /// looked up, so a partial body never touches the stored record.
    pub async fn update(
        &self,
        id: &str,
        description: Option<&str>,
        completed: Option<bool>,
    ) -> ServiceResult<Task> {
        let (description, completed) = match (description.map(str::trim), completed) {
            (Some(d), Some(c)) if !d.is_empty() => (d.to_string(), c),
            _ => return Err(ServiceError::Validation(UPDATE_FIELDS_REQUIRED.to_string())),
        };

        let id = parse_task_id(id)?;
        let task = self
            .repo
            .update(id, TaskChanges { description, completed })
            .await?
            .ok_or_else(not_found)?;

        self.invalidate_list().await?;
        tracing::info!(task_id = %task.id, completed = task.completed, "Task updated");

        Ok(task)
    }

    /// Deletes a task
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_task_id(id)?;

        if !self.repo.delete_by_id(id).await? {
            return Err(not_found());
        }

        self.invalidate_list().await?;
        tracing::info!(task_id = %id, "Task deleted");

        Ok(())
    }

    /// Checks that the repository and the cache respond
    pub async fn check_dependencies(&self) -> DependencyHealth {
        let database = match self.repo.health_check().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Task store health check failed");
                false
            }
        };
        let cache = self.cache.ping().await.unwrap_or(false);

        DependencyHealth { database, cache }
    }

    async fn invalidate_list(&self) -> ServiceResult<()> {
        self.cache.delete(TASK_LIST_CACHE_KEY).await?;
        tracing::debug!(key = TASK_LIST_CACHE_KEY, "Task list cache invalidated");
        Ok(())
    }
}

/// Ids that are not UUIDs cannot name a task
fn parse_task_id(id: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| not_found())
}

fn not_found() -> ServiceError {
    ServiceError::NotFound(TASK_NOT_FOUND.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, InMemoryCache};
    use crate::repository::InMemoryTaskRepository;
    use async_trait::async_trait;

    struct Fixture {
        repo: Arc<InMemoryTaskRepository>,
        cache: Arc<InMemoryCache>,
        service: TaskService,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let service = TaskService::new(repo.clone(), cache.clone());
        Fixture { repo, cache, service }
    }

    /// Cache whose every command fails
    struct BrokenCache;

    #[async_trait]
    impl Cache for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Connection("refused".to_string()))
        }

        async fn set_ex(&self, _key: &str, _value: &str, _ttl: u64) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".to_string()))
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Connection("refused".to_string()))
        }

        async fn ping(&self) -> Result<bool, CacheError> {
            Err(CacheError::Connection("refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let f = fixture();
        let task = f.service.create(Some("  buy milk ")).await.unwrap();

        assert_eq!(task.description, "buy milk");
        assert!(!task.completed);
        assert_eq!(f.service.get(&task.id.to_string()).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_create_requires_description() {
        let f = fixture();

        for description in [None, Some(""), Some("   ")] {
            let err = f.service.create(description).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(ref m) if m == DESCRIPTION_REQUIRED));
        }
        assert!(f.service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_cached_until_ttl() {
        let f = fixture();
        f.service.create(Some("a")).await.unwrap();

        let first = f.service.list().await.unwrap();
        assert_eq!(f.repo.find_all_calls(), 1);
        assert!(f.cache.contains_key(TASK_LIST_CACHE_KEY));

        let second = f.service.list().await.unwrap();
        assert_eq!(second, first);
        assert_eq!(f.repo.find_all_calls(), 1, "second read should be a cache hit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_list_expires() {
        let f = fixture();
        f.service.list().await.unwrap();

        tokio::time::advance(std::time::Duration::from_secs(DEFAULT_LIST_TTL_SECS)).await;
        f.service.list().await.unwrap();
        assert_eq!(f.repo.find_all_calls(), 2);
    }

    #[tokio::test]
    async fn test_writes_invalidate_list() {
        let f = fixture();
        let task = f.service.create(Some("a")).await.unwrap();
        assert_eq!(f.service.list().await.unwrap(), vec![task.clone()]);

        let updated = f
            .service
            .update(&task.id.to_string(), Some("a, revised"), Some(true))
            .await
            .unwrap();
        assert!(!f.cache.contains_key(TASK_LIST_CACHE_KEY));
        assert_eq!(f.service.list().await.unwrap(), vec![updated]);

        let other = f.service.create(Some("b")).await.unwrap();
        assert!(!f.cache.contains_key(TASK_LIST_CACHE_KEY));
        assert_eq!(f.service.list().await.unwrap().len(), 2);

        f.service.delete(&task.id.to_string()).await.unwrap();
        assert!(!f.cache.contains_key(TASK_LIST_CACHE_KEY));
        assert_eq!(f.service.list().await.unwrap(), vec![other]);
        assert_eq!(f.repo.find_all_calls(), 4);
    }

    #[tokio::test]
    async fn test_update_requires_both_fields() {
        let f = fixture();
        let task = f.service.create(Some("original")).await.unwrap();
        let id = task.id.to_string();

        let partial_bodies = [
            (None, Some(true)),
            (Some("new text"), None),
            (Some("  "), Some(false)),
            (None, None),
        ];
        for (description, completed) in partial_bodies {
            let err = f.service.update(&id, description, completed).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(ref m) if m == UPDATE_FIELDS_REQUIRED));
        }

        // Record untouched
        assert_eq!(f.service.get(&id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_validation_precedes_not_found() {
        let f = fixture();
        let missing = Uuid::new_v4().to_string();

        let err = f.service.update(&missing, None, Some(true)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = f.service.update(&missing, Some("x"), Some(true)).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_tasks_are_not_found() {
        let f = fixture();
        let missing = Uuid::new_v4().to_string();

        assert!(matches!(f.service.get(&missing).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.service.delete(&missing).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.service.get("not-a-uuid").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.service.delete("42").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_write_keeps_cache() {
        let f = fixture();
        f.service.create(Some("a")).await.unwrap();
        f.service.list().await.unwrap();

        let missing = Uuid::new_v4().to_string();
        let _ = f.service.delete(&missing).await;
        assert!(f.cache.contains_key(TASK_LIST_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let f = fixture();
        let task = f.service.create(Some("a")).await.unwrap();
        let id = task.id.to_string();

        f.service.delete(&id).await.unwrap();
        assert!(matches!(f.service.delete(&id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_cache_failure_is_internal() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let service = TaskService::new(repo.clone(), Arc::new(BrokenCache));

        assert!(matches!(service.list().await, Err(ServiceError::Internal(_))));
        assert_eq!(repo.find_all_calls(), 0);
        assert!(matches!(service.create(Some("a")).await, Err(ServiceError::Internal(_))));
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_internal() {
        let f = fixture();
        f.cache.set_ex(TASK_LIST_CACHE_KEY, "not json", 60).await.unwrap();

        assert!(matches!(f.service.list().await, Err(ServiceError::Internal(_))));
    }

    #[tokio::test]
    async fn test_dependency_health() {
        let f = fixture();
        let health = f.service.check_dependencies().await;
        assert!(health.is_healthy());

        let broken = TaskService::new(f.repo.clone(), Arc::new(BrokenCache));
        let health = broken.check_dependencies().await;
        assert!(health.database);
        assert!(!health.cache);
        assert!(!health.is_healthy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_ttl() {
        let f = fixture();
        let service = TaskService::new(f.repo.clone(), f.cache.clone()).with_list_ttl(5);

        service.list().await.unwrap();
        tokio::time::advance(std::time::Duration::from_secs(4)).await;
        service.list().await.unwrap();
        assert_eq!(f.repo.find_all_calls(), 1);

        tokio::time::advance(std::time::Duration::from_secs(1)).await;
        service.list().await.unwrap();
        assert_eq!(f.repo.find_all_calls(), 2);
    }
}
