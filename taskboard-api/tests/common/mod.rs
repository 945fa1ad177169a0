//! Common test utilities for integration tests
//!
//! Builds the full router over in-memory repositories and cache, so the
//! HTTP surface can be exercised without PostgreSQL or Redis. The fakes are
//! exposed on the context for assertions (store reads, cache contents,
//! uploaded photos).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::Config;
use taskboard_shared::cache::InMemoryCache;
use taskboard_shared::repository::{InMemoryTaskRepository, InMemoryUserRepository};
use taskboard_shared::storage::InMemoryPhotoStore;
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Public prefix of photos in the in-memory store
pub const PHOTO_BASE_URL: &str = "http://localhost:3000/uploads";

const BOUNDARY: &str = "taskboard-test-boundary";

/// Test context containing the app and its in-memory collaborators
pub struct TestContext {
    pub app: axum::Router,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub cache: Arc<InMemoryCache>,
    pub photos: Arc<InMemoryPhotoStore>,
}

/// Configuration values shared by every test app
fn base_env() -> HashMap<String, String> {
    [
        ("DATABASE_URL", "postgresql://unused/taskboard"),
        ("REDIS_URL", "redis://unused:6379"),
        ("JWT_SECRET", TEST_SECRET),
        // Cheapest Argon2 settings keep the suite fast
        ("PASSWORD_HASH_COST", "1"),
        ("PASSWORD_HASH_MEMORY_KIB", "1024"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl TestContext {
    /// Creates a context with default configuration
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Creates a context with extra configuration values
    pub fn with_env(overrides: &[(&str, &str)]) -> Self {
        let mut env = base_env();
        for (k, v) in overrides {
            env.insert(k.to_string(), v.to_string());
        }
        let config = Config::from_lookup(|key| env.get(key).cloned()).expect("valid test config");

        let tasks = Arc::new(InMemoryTaskRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let cache = Arc::new(InMemoryCache::new());
        let photos = Arc::new(InMemoryPhotoStore::new(PHOTO_BASE_URL));

        let state = AppState::new(
            tasks.clone(),
            users.clone(),
            cache.clone(),
            photos.clone(),
            config,
        )
        .expect("valid app state");

        TestContext {
            app: build_router(state),
            tasks,
            users,
            cache,
            photos,
        }
    }

    /// Sends a request and returns status plus parsed JSON body (Null when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    /// Sends a prepared request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    /// Posts a single-part multipart form to `/profile/photo`
    pub async fn upload_photo(
        &self,
        token: Option<&str>,
        field: &str,
        content_type: &str,
        data: &[u8],
    ) -> (StatusCode, Value) {
        let mut body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"{f}\"; filename=\"photo\"\r\nContent-Type: {ct}\r\n\r\n",
            b = BOUNDARY,
            f = field,
            ct = content_type,
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        let mut builder = Request::builder()
            .method("POST")
            .uri("/profile/photo")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            );
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        self.send_request(builder.body(Body::from(body)).unwrap()).await
    }

    /// Signs up a user and returns the response body
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/signup",
                Some(serde_json::json!({ "name": name, "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        body
    }
}
