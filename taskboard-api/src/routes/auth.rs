/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Signup
/// - Signin
/// - Token refresh
/// - Profile (read and update, Bearer token required)
///
/// # Endpoints
///
/// - `POST /signup` - Register and receive tokens
/// - `POST /signin` - Login and receive tokens
/// - `POST /refresh` - Exchange a refresh token for a new pair
/// - `GET /profile` - Current user
/// - `PATCH /profile` - Update name, email or photo

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskboard_shared::{
    auth::{jwt::TokenPair, middleware::AuthContext},
    models::user::UserView,
    services::auth::{AuthPayload, ProfileChanges, SigninInput, SignupInput},
};
use validator::Validate;

const SIGNUP_FAILED: &str = "Erro ao registrar usuário";
const SIGNIN_FAILED: &str = "Erro ao autenticar usuário";
const PROFILE_FAILED: &str = "Erro ao carregar perfil";

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(max = 100, message = "Nome deve ter no máximo 100 caracteres"))]
    pub name: Option<String>,

    /// Email address
    #[validate(length(max = 254, message = "E-mail deve ter no máximo 254 caracteres"))]
    pub email: Option<String>,

    /// Password
    #[validate(length(max = 128, message = "Senha deve ter no máximo 128 caracteres"))]
    pub password: Option<String>,

    /// Optional photo URL
    #[validate(length(max = 2048, message = "URL da foto muito longa"))]
    pub photo: Option<String>,
}

/// Signin request
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Profile update request; absent fields are unchanged, an empty photo removes it
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100, message = "Nome deve ter no máximo 100 caracteres"))]
    pub name: Option<String>,

    #[validate(length(max = 254, message = "E-mail deve ter no máximo 254 caracteres"))]
    pub email: Option<String>,

    #[validate(length(max = 2048, message = "URL da foto muito longa"))]
    pub photo: Option<String>,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /signup
/// Content-Type: application/json
///
/// {
///   "name": "Maria",
///   "email": "maria@example.com",
///   "password": "s3nh4",
///   "photo": "https://cdn.example.com/maria.png"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "user": { "id": "uuid", "name": "Maria", "email": "maria@example.com", "photo": null },
///   "accessToken": "eyJ...",
///   "refreshToken": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields or malformed email
/// - `409 Conflict`: Email already registered
/// - `500 Internal Server Error`: `Erro ao registrar usuário`
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthPayload>)> {
    let Json(req) = payload?;
    req.validate()?;

    let auth = state
        .auth
        .signup(SignupInput {
            name: req.name,
            email: req.email,
            password: req.password,
            photo: req.photo,
        })
        .await
        .map_err(|e| ApiError::from(e).internal_message(SIGNUP_FAILED))?;

    Ok((StatusCode::CREATED, Json(auth)))
}

/// Login with email and password
///
/// # Errors
///
/// - `400 Bad Request`: Missing email or password
/// - `401 Unauthorized`: Invalid credentials (same response for unknown email and wrong password)
/// - `500 Internal Server Error`: `Erro ao autenticar usuário`
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> ApiResult<Json<AuthPayload>> {
    let Json(req) = payload?;

    let auth = state
        .auth
        .signin(SigninInput {
            email: req.email,
            password: req.password,
        })
        .await
        .map_err(|e| ApiError::from(e).internal_message(SIGNIN_FAILED))?;

    Ok(Json(auth))
}

/// Exchange a refresh token for a new token pair
///
/// # Errors
///
/// - `400 Bad Request`: Missing refresh token
/// - `401 Unauthorized`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let Json(req) = payload?;
    Ok(Json(state.auth.refresh(req.refresh_token.as_deref()).await?))
}

/// Get the authenticated user's profile
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token (from middleware)
/// - `404 Not Found`: The user no longer exists
/// - `500 Internal Server Error`: `Erro ao carregar perfil`
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserView>> {
    let user = state
        .auth
        .get_profile(auth.user_id)
        .await
        .map_err(|e| ApiError::from(e).internal_message(PROFILE_FAILED))?;

    Ok(Json(user))
}

/// Update the authenticated user's profile
///
/// # Errors
///
/// - `400 Bad Request`: Blank name or email, malformed email
/// - `401 Unauthorized`: Missing or invalid token (from middleware)
/// - `404 Not Found`: The user no longer exists
/// - `409 Conflict`: Email belongs to another user
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResult<Json<UserView>> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state
        .auth
        .update_profile(
            auth.user_id,
            ProfileChanges {
                name: req.name,
                email: req.email,
                photo: req.photo,
            },
        )
        .await?;

    Ok(Json(user))
}
