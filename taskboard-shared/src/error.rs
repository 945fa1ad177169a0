/// Service error taxonomy
///
/// Every service operation returns `ServiceResult<T>`. Collaborator failures
/// (store, cache, hashing, token signing) are converted at the service
/// boundary into the nearest variant; anything without a better home becomes
/// `Internal`.
///
/// | Variant              | HTTP |
/// |----------------------|------|
/// | `Validation`         | 400  |
/// | `InvalidCredentials` | 401  |
/// | `MissingToken`       | 401  |
/// | `InvalidToken`       | 401  |
/// | `NotFound`           | 404  |
/// | `Conflict`           | 409  |
/// | `Internal`           | 500  |
///
/// Display strings of the client-facing variants are the messages returned in
/// the `{"error": ...}` body.

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::cache::CacheError;
use crate::repository::RepositoryError;
use crate::storage::StorageError;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Message for signin failures, shared by "no such user" and "wrong password"
pub const INVALID_CREDENTIALS: &str = "Credenciais inválidas";

/// Message for a missing or malformed Authorization header
pub const MISSING_TOKEN: &str = "Token não fornecido";

/// Message for tokens with a bad signature, wrong type or past expiry
pub const INVALID_TOKEN: &str = "Token inválido ou expirado";

/// Unified service error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    /// Uniqueness violation (duplicate email)
    #[error("{0}")]
    Conflict(String),

    /// Unknown email or wrong password (deliberately indistinguishable)
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    /// Authorization header absent or not `Bearer <token>`
    #[error("Token não fornecido")]
    MissingToken,

    /// Token signature invalid, wrong type, or expired
    #[error("Token inválido ou expirado")]
    InvalidToken,

    /// Entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Store, cache or crypto failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable machine-readable code for logs and tests
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::InvalidCredentials => "invalid_credentials",
            ServiceError::MissingToken => "missing_token",
            ServiceError::InvalidToken => "invalid_token",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(msg) => ServiceError::Conflict(msg),
            RepositoryError::Database(e) => ServiceError::Internal(format!("Database error: {}", e)),
            RepositoryError::Storage(msg) => ServiceError::Internal(format!("Storage error: {}", msg)),
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        ServiceError::Internal(format!("Cache error: {}", err))
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Internal(format!("Photo storage error: {}", err))
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            _ => ServiceError::InvalidToken,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(format!("Serialization error: {}", err))
    }
}
