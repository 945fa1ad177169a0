/// Health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /        -> {"message": "Hello World"}
/// GET /health  -> dependency report
/// ```
///
/// # Health Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "cache": "connected"
/// }
/// ```
///
/// The endpoint always answers 200; `status` is `degraded` when a
/// dependency is unreachable.

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Cache status
    pub cache: String,
}

fn connection_status(ok: bool) -> String {
    if ok { "connected" } else { "disconnected" }.to_string()
}

/// Greeting handler
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello World" }))
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.tasks.check_dependencies().await;

    Json(HealthResponse {
        status: if health.is_healthy() { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: connection_status(health.database),
        cache: connection_status(health.cache),
    })
}
