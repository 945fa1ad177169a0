/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access/refresh token generation and validation
/// - [`middleware`]: Bearer header parsing and the request auth context
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password, PasswordConfig};
/// use taskboard_shared::auth::jwt::TokenConfig;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password", &PasswordConfig::minimal())?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let tokens = TokenConfig::new("secret-key-that-is-at-least-32-bytes");
/// let pair = tokens.issue_pair(Uuid::new_v4(), "user@example.com")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
