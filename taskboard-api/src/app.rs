/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use taskboard_shared::cache::InMemoryCache;
/// use taskboard_shared::repository::{InMemoryTaskRepository, InMemoryUserRepository};
/// use taskboard_shared::storage::InMemoryPhotoStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(
///     Arc::new(InMemoryTaskRepository::new()),
///     Arc::new(InMemoryUserRepository::new()),
///     Arc::new(InMemoryCache::new()),
///     Arc::new(InMemoryPhotoStore::new("/uploads")),
///     config,
/// )?;
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use taskboard_shared::{
    auth::middleware::authorization_header,
    cache::Cache,
    repository::{TaskRepository, UserRepository},
    services::{AuthService, PhotoService, TaskService},
    storage::PhotoStore,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Task operations
    pub tasks: Arc<TaskService>,

    /// Signup, signin and profile operations
    pub auth: Arc<AuthService>,

    /// Profile photo uploads
    pub photos: Arc<PhotoService>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services from injected storage, cache and photo store
    ///
    /// # Errors
    ///
    /// Returns an error if the token lifetimes cannot be represented.
    pub fn new(
        task_repo: Arc<dyn TaskRepository>,
        user_repo: Arc<dyn UserRepository>,
        cache: Arc<dyn Cache>,
        photo_store: Arc<dyn PhotoStore>,
        config: Config,
    ) -> anyhow::Result<Self> {
        let tasks = TaskService::new(task_repo, cache).with_list_ttl(config.cache.tasks_ttl_secs);
        let photos = PhotoService::new(photo_store, user_repo.clone())
            .with_max_bytes(config.uploads.max_bytes);
        let auth = AuthService::new(user_repo, config.token_config()?, config.password_config());

        Ok(Self {
            tasks: Arc::new(tasks),
            auth: Arc::new(auth),
            photos: Arc::new(photos),
            config: Arc::new(config),
        })
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /              # Greeting (public)
/// ├── GET    /health        # Health check (public)
/// ├── GET    /tasks         # List tasks (cached)
/// ├── POST   /tasks         # Create task
/// ├── GET    /tasks/:id     # Get task
/// ├── PUT    /tasks/:id     # Replace task
/// ├── DELETE /tasks/:id     # Delete task
/// ├── POST   /signup        # Register
/// ├── POST   /signin        # Login
/// ├── POST   /refresh       # Exchange refresh token
/// ├── /profile              # Requires Bearer token
/// │   ├── GET
/// │   ├── PATCH
/// │   └── POST /photo        # Multipart upload
/// └── GET    /uploads/*     # Stored photos
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication (profile routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check));

    let task_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/signin", post(routes::auth::signin))
        .route("/refresh", post(routes::auth::refresh));

    // Multipart framing on top of the largest accepted photo
    let upload_limit = state.photos.max_bytes() + 64 * 1024;

    // Profile routes (require JWT authentication)
    let profile_routes = Router::new()
        .route(
            "/profile",
            get(routes::auth::get_profile).patch(routes::auth::update_profile),
        )
        .route(
            "/profile/photo",
            post(routes::photos::upload_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(task_routes)
        .merge(auth_routes)
        .merge(profile_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.uploads.dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the Bearer token from the Authorization header, then injects
/// the `AuthContext` into request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = state.auth.authenticate(authorization_header(req.headers()))?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
