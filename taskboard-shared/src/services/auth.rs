/// Authentication service
///
/// Handles signup, signin, token refresh and profile access. Passwords are
/// hashed with Argon2id on a blocking thread; tokens are stateless JWT pairs
/// (see [`crate::auth::jwt`]). There is no server-side session or revocation
/// list, so logging out is purely a client concern.
///
/// Signin failures never reveal whether the email exists: an unknown email
/// and a wrong password both yield `ServiceError::InvalidCredentials`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskboard_shared::auth::{jwt::TokenConfig, password::PasswordConfig};
/// use taskboard_shared::repository::InMemoryUserRepository;
/// use taskboard_shared::services::auth::{AuthService, SignupInput};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let service = AuthService::new(
///     Arc::new(InMemoryUserRepository::new()),
///     TokenConfig::new("secret-key-that-is-at-least-32-bytes"),
///     PasswordConfig::minimal(),
/// );
///
/// let payload = service
///     .signup(SignupInput {
///         name: Some("Maria".to_string()),
///         email: Some("Maria@Example.com".to_string()),
///         password: Some("s3nh4".to_string()),
///         photo: None,
///     })
///     .await?;
///
/// assert_eq!(payload.user.email, "maria@example.com");
/// let header = format!("Bearer {}", payload.tokens.access_token);
/// assert_eq!(service.verify_token(Some(&header))?, payload.user.id);
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::auth::jwt::{TokenConfig, TokenPair};
use crate::auth::middleware::{bearer_token, AuthContext};
use crate::auth::password::{hash_password, verify_password, PasswordConfig, PasswordError};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{normalize_email, CreateUser, UpdateUser, UserView};
use crate::repository::{RepositoryError, UserRepository};

const SIGNUP_FIELDS_REQUIRED: &str = "Nome, e-mail e senha são obrigatórios";
const SIGNIN_FIELDS_REQUIRED: &str = "E-mail e senha são obrigatórios";
const REFRESH_TOKEN_REQUIRED: &str = "Refresh token obrigatório";
const EMPTY_PROFILE_FIELD: &str = "Nome e e-mail não podem ser vazios";
const INVALID_EMAIL: &str = "E-mail inválido";
const EMAIL_TAKEN: &str = "E-mail já registrado";
const USER_NOT_FOUND: &str = "Usuário não encontrado";

/// Signup request; every field is optional so absence is reported as a validation error
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub photo: Option<String>,
}

/// Signin request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SigninInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Profile changes; absent fields are left as they are
///
/// An empty `photo` string removes the photo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
}

/// Signup/signin response: the user plus a fresh token pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub user: UserView,

    #[serde(flatten)]
    pub tokens: TokenPair,
}

/// Signup, signin, token verification and profile management
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: TokenConfig,
    passwords: PasswordConfig,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenConfig, passwords: PasswordConfig) -> Self {
        Self {
            users,
            tokens,
            passwords,
        }
    }

    /// Token settings in use
    pub fn token_config(&self) -> &TokenConfig {
        &self.tokens
    }

    /// Registers a new account and signs it in
    ///
    /// # Errors
    ///
    /// - `Validation` if name, email or password is missing, or the email is malformed
    /// - `Conflict` if the email is already registered (case-insensitive)
    pub async fn signup(&self, input: SignupInput) -> ServiceResult<AuthPayload> {
        let (Some(name), Some(email), Some(password)) = (
            non_empty(input.name),
            non_empty(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(ServiceError::Validation(SIGNUP_FIELDS_REQUIRED.to_string()));
        };

        let email = normalize_email(&email);
        if !email.validate_email() {
            return Err(ServiceError::Validation(INVALID_EMAIL.to_string()));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            tracing::warn!("Signup rejected: email already registered");
            return Err(ServiceError::Conflict(EMAIL_TAKEN.to_string()));
        }

        let password_hash = self.hash(password).await?;

        // A concurrent signup can still win the race; the unique constraint decides
        let user = self
            .users
            .create(CreateUser {
                name,
                email,
                password_hash,
                photo_url: non_empty(input.photo),
            })
            .await
            .map_err(email_conflict)?;

        tracing::info!(user_id = %user.id, "User signed up");

        let tokens = self.tokens.issue_pair(user.id, &user.email)?;
        Ok(AuthPayload {
            user: user.into(),
            tokens,
        })
    }

    /// Authenticates with email and password
    ///
    /// # Errors
    ///
    /// - `Validation` if email or password is missing
    /// - `InvalidCredentials` for an unknown email or a wrong password
    pub async fn signin(&self, input: SigninInput) -> ServiceResult<AuthPayload> {
        let (Some(email), Some(password)) = (
            non_empty(input.email),
            input.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(ServiceError::Validation(SIGNIN_FIELDS_REQUIRED.to_string()));
        };

        let Some(user) = self.users.find_by_email(&normalize_email(&email)).await? else {
            tracing::warn!("Signin failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.verify(password, user.password_hash.clone()).await? {
            tracing::warn!(user_id = %user.id, "Signin failed: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "User signed in");

        let tokens = self.tokens.issue_pair(user.id, &user.email)?;
        Ok(AuthPayload {
            user: user.into(),
            tokens,
        })
    }

    /// Validates an `Authorization` header and returns the caller's context
    ///
    /// # Errors
    ///
    /// - `MissingToken` if the header is absent or not `Bearer <token>`
    /// - `InvalidToken` if the signature, type or expiry check fails
    pub fn authenticate(&self, authorization: Option<&str>) -> ServiceResult<AuthContext> {
        let token = bearer_token(authorization)?;

        let claims = self.tokens.verify_access(token).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            ServiceError::InvalidToken
        })?;

        Ok(claims.into())
    }

    /// Validates an `Authorization` header and returns the user ID
    pub fn verify_token(&self, authorization: Option<&str>) -> ServiceResult<Uuid> {
        self.authenticate(authorization).map(|ctx| ctx.user_id)
    }

    /// Gets the profile of an authenticated user
    pub async fn get_profile(&self, user_id: Uuid) -> ServiceResult<UserView> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserView::from)
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// Exchanges a refresh token for a new token pair
    ///
    /// # Errors
    ///
    /// - `Validation` if the token is missing
    /// - `InvalidToken` if it fails validation or its user no longer exists
    pub async fn refresh(&self, refresh_token: Option<&str>) -> ServiceResult<TokenPair> {
        let token = refresh_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::Validation(REFRESH_TOKEN_REQUIRED.to_string()))?;

        let claims = self.tokens.verify_refresh(token).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            ServiceError::InvalidToken
        })?;

        let user = self
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(ServiceError::InvalidToken)?;

        tracing::debug!(user_id = %user.id, "Token pair refreshed");
        Ok(self.tokens.issue_pair(user.id, &user.email)?)
    }

    /// Updates name, email and/or photo of an authenticated user
    ///
    /// # Errors
    ///
    /// - `Validation` if a present name or email is blank, or the email is malformed
    /// - `Conflict` if the new email belongs to another user
    /// - `NotFound` if the user no longer exists
    pub async fn update_profile(&self, user_id: Uuid, changes: ProfileChanges) -> ServiceResult<UserView> {
        let name = match changes.name.map(|n| n.trim().to_string()) {
            Some(n) if n.is_empty() => {
                return Err(ServiceError::Validation(EMPTY_PROFILE_FIELD.to_string()))
            }
            other => other,
        };

        let email = match changes.email.map(|e| normalize_email(&e)) {
            Some(e) if e.is_empty() => {
                return Err(ServiceError::Validation(EMPTY_PROFILE_FIELD.to_string()))
            }
            Some(e) if !e.validate_email() => {
                return Err(ServiceError::Validation(INVALID_EMAIL.to_string()))
            }
            other => other,
        };

        let update = UpdateUser {
            name,
            email,
            photo_url: changes.photo.map(|p| non_empty(Some(p))),
        };

        if update.is_empty() {
            return self.get_profile(user_id).await;
        }

        let user = self
            .users
            .update(user_id, update)
            .await
            .map_err(email_conflict)?
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))?;

        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user.into())
    }

    async fn hash(&self, password: String) -> ServiceResult<String> {
        let config = self.passwords;
        tokio::task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .map_err(|e| ServiceError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(ServiceError::from)
    }

    async fn verify(&self, password: String, hash: String) -> ServiceResult<bool> {
        let result: Result<bool, PasswordError> =
            tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .map_err(|e| ServiceError::Internal(format!("Verification task failed: {}", e)))?;
        Ok(result?)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn email_conflict(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::Conflict(_) => ServiceError::Conflict(EMAIL_TAKEN.to_string()),
        other => other.into(),
    }
}
