/// JWT token generation and validation module
///
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the user's id and
/// email. Every successful signup or signin yields a [`TokenPair`]: a
/// short-lived access token and a long-lived refresh token, signed with
/// separate secrets.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: Configurable (default 24 hours for access, 7 days for refresh)
/// - **Validation**: Signature, expiration (zero leeway), issuer and token type
/// - **Revocation**: None. Tokens stay valid until they expire; logout is client-side
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::TokenConfig;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TokenConfig::new("your-secret-key-at-least-32-bytes-long");
/// let user_id = Uuid::new_v4();
///
/// let pair = config.issue_pair(user_id, "maria@example.com")?;
/// let claims = config.verify_access(&pair.access_token)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim stamped on and required from every token
pub const ISSUER: &str = "taskboard";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,

    /// Token type does not match the expected one
    #[error("Expected {expected} token, got {actual} token")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived), used for API authentication
    Access,

    /// Refresh token (long-lived), used to obtain new token pairs
    Refresh,
}

impl TokenType {
    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskboard")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
///
/// # Custom Claims
///
/// - `email`: The user's (lowercase) email
/// - `token_type`: Access or refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// User email (custom claim)
    pub email: String,

    /// Issuer - Always "taskboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates claims expiring `expires_in` from now
    ///
    /// A zero or negative duration produces claims that are already expired.
    pub fn new(user_id: Uuid, email: &str, token_type: TokenType, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            email: email.to_string(),
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Access + refresh token pair returned by signup, signin and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signing secrets and lifetimes for both token types
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret for access tokens
    pub access_secret: String,

    /// Secret for refresh tokens (defaults to the access secret)
    pub refresh_secret: String,

    /// Access token lifetime
    pub access_ttl: Duration,

    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Default access token lifetime: 24 hours
    pub fn default_access_ttl() -> Duration {
        Duration::hours(24)
    }

    /// Default refresh token lifetime: 7 days
    pub fn default_refresh_ttl() -> Duration {
        Duration::days(7)
    }

    /// Creates a config using one secret for both token types and default lifetimes
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        Self {
            refresh_secret: secret.clone(),
            access_secret: secret,
            access_ttl: Self::default_access_ttl(),
            refresh_ttl: Self::default_refresh_ttl(),
        }
    }

    /// Uses a distinct secret for refresh tokens
    pub fn with_refresh_secret(mut self, secret: impl Into<String>) -> Self {
        self.refresh_secret = secret.into();
        self
    }

    /// Overrides both lifetimes
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    fn secret_for(&self, token_type: TokenType) -> &str {
        match token_type {
            TokenType::Access => &self.access_secret,
            TokenType::Refresh => &self.refresh_secret,
        }
    }

    fn ttl_for(&self, token_type: TokenType) -> Duration {
        match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        }
    }

    /// Signs a single token of the given type
    pub fn issue(&self, user_id: Uuid, email: &str, token_type: TokenType) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, email, token_type, self.ttl_for(token_type));
        create_token(&claims, self.secret_for(token_type))
    }

    /// Signs a fresh access + refresh pair for a user
    pub fn issue_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue(user_id, email, TokenType::Access)?,
            refresh_token: self.issue(user_id, email, TokenType::Refresh)?,
        })
    }

    /// Validates an access token with the access secret
    pub fn verify_access(&self, token: &str) -> Result<Claims, JwtError> {
        validate_typed_token(token, &self.access_secret, TokenType::Access)
    }

    /// Validates a refresh token with the refresh secret
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        validate_typed_token(token, &self.refresh_secret, TokenType::Refresh)
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 (HMAC-SHA256) with the provided secret.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired (no leeway; `exp <= now` counts as expired)
/// - Issuer is "taskboard"
/// - Token is not used before nbf time
///
/// # Errors
///
/// Returns error if:
/// - Signature is invalid
/// - Token has expired
/// - Issuer doesn't match
/// - Token format is invalid
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    // The library accepts exp == now; a token issued with a zero lifetime must not be usable
    if token_data.claims.is_expired() {
        return Err(JwtError::Expired);
    }

    Ok(token_data.claims)
}

fn validate_typed_token(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != expected {
        return Err(JwtError::WrongType {
            expected: expected.as_str(),
            actual: claims.token_type.as_str(),
        });
    }

    Ok(claims)
}
