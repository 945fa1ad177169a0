/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks` - List all tasks (served from cache when warm)
/// - `POST /tasks` - Create a task
/// - `GET /tasks/:id` - Get a task
/// - `PUT /tasks/:id` - Replace description and completion flag
/// - `DELETE /tasks/:id` - Delete a task
///
/// # Task Representation
///
/// ```json
/// {
///   "id": "uuid",
///   "description": "Buy milk",
///   "completed": false,
///   "createdAt": "2025-01-01T12:00:00Z",
///   "updatedAt": "2025-01-01T12:00:00Z"
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskboard_shared::models::task::Task;

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub description: Option<String>,
}

/// Replace task request; both fields are required
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// List all tasks
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.list().await?))
}

/// Create a task
///
/// # Errors
///
/// - `400 Bad Request`: Missing or blank description, malformed JSON
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    let task = state.tasks.create(req.description.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Get a task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID (including IDs that are not UUIDs)
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.tasks.get(&id).await?))
}

/// Replace a task
///
/// # Errors
///
/// - `400 Bad Request`: Description or completion flag missing
/// - `404 Not Found`: No task with this ID
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Json(req) = payload?;
    let task = state
        .tasks
        .update(&id, req.description.as_deref(), req.completed)
        .await?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: No task with this ID
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.tasks.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
