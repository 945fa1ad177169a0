/// Request authentication primitives
///
/// The HTTP layer reads the `Authorization` header, hands it to
/// [`AuthService::authenticate`](crate::services::auth::AuthService::authenticate),
/// and stores the resulting [`AuthContext`] in the request extensions.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use taskboard_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::Claims;
use crate::error::{ServiceError, ServiceResult};

/// Authentication context added to request extensions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email the token was issued for
    pub email: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

/// Raw `Authorization` header value, if present and valid UTF-8
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// Extracts the token from a `Bearer <token>` header value
///
/// # Errors
///
/// `ServiceError::MissingToken` when the header is absent, uses another
/// scheme, or carries an empty token.
pub fn bearer_token(header: Option<&str>) -> ServiceResult<&str> {
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .ok_or(ServiceError::MissingToken)?;

    if token.is_empty() {
        return Err(ServiceError::MissingToken);
    }

    Ok(token)
}
