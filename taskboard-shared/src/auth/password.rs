/// Password hashing module using Argon2id
///
/// Passwords are hashed with Argon2id before they reach the store; the
/// plaintext is never persisted or logged. Cost parameters come from
/// [`PasswordConfig`] so deployments can tune them (`PASSWORD_HASH_COST`,
/// `PASSWORD_HASH_MEMORY_KIB`). The parameters are embedded in the PHC string,
/// so hashes made under older settings keep verifying after a change.
///
/// # Security
///
/// - **Algorithm**: Argon2id (hybrid of Argon2i and Argon2d)
/// - **Memory**: 64 MB by default
/// - **Iterations**: 3 passes by default
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password, PasswordConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PasswordConfig::minimal();
/// let hash = hash_password("super_secret_password_123", &config)?;
///
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordConfig {
    /// Number of passes (t_cost)
    pub time_cost: u32,

    /// Memory in KiB (m_cost)
    pub memory_kib: u32,

    /// Parallel lanes (p_cost)
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            time_cost: 3,
            memory_kib: 65536,
            parallelism: 4,
        }
    }
}

impl PasswordConfig {
    /// Cheapest valid parameters, for tests and local development
    pub fn minimal() -> Self {
        Self {
            time_cost: 1,
            memory_kib: 1024,
            parallelism: 1,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(self.memory_kib)
            .t_cost(self.time_cost)
            .p_cost(self.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashes a password using Argon2id
///
/// A fresh 16-byte salt is drawn from the OS RNG for every call, so hashing
/// the same password twice yields different strings.
///
/// # Returns
///
/// PHC string format hash (includes algorithm, parameters, salt, and hash)
///
/// ```text
/// $argon2id$v=19$m=65536,t=3,p=4$c2FsdHNhbHRzYWx0$hash...
/// ```
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are invalid or hashing fails
pub fn hash_password(password: &str, config: &PasswordConfig) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = config
        .hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a hash
///
/// Comparison is constant-time.
///
/// # Returns
///
/// `Ok(true)` if password matches, `Ok(false)` if it doesn't match
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed
/// or carries no hash output, `PasswordError::VerifyError` for any other failure.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // A PHC string without an output would otherwise read as a mismatch
    if parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash("Hash has no output".to_string()));
    }

    // Parameters are read from the hash itself
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_default_parameters() {
        let hash = hash_password("test_password_123", &PasswordConfig::default())
            .expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_configured_cost_is_embedded() {
        let config = PasswordConfig {
            time_cost: 2,
            memory_kib: 2048,
            parallelism: 1,
        };
        let hash = hash_password("pw", &config).unwrap();
        assert!(hash.contains("m=2048,t=2,p=1"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let config = PasswordConfig::minimal();
        let hash1 = hash_password("same_password", &config).unwrap();
        let hash2 = hash_password("same_password", &config).unwrap();

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("correct_password", &PasswordConfig::minimal()).unwrap();

        assert!(verify_password("correct_password", &hash).unwrap());
        assert!(!verify_password("wrong_password", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_survives_cost_change() {
        let old = hash_password("pw", &PasswordConfig::minimal()).unwrap();
        let _new = hash_password("pw", &PasswordConfig::default()).unwrap();

        assert!(verify_password("pw", &old).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        assert!(matches!(
            verify_password("password", "$argon2id$invalid"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_hash_without_output_is_invalid() {
        assert!(matches!(
            verify_password("password", "$argon2id$v=19$m=1024,t=1,p=1$AAAA"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let config = PasswordConfig {
            time_cost: 0,
            memory_kib: 1024,
            parallelism: 1,
        };
        assert!(matches!(
            hash_password("pw", &config),
            Err(PasswordError::HashError(_))
        ));
    }

    #[test]
    fn test_unicode_password() {
        let hash = hash_password("senha-密码-パスワード", &PasswordConfig::minimal()).unwrap();
        assert!(verify_password("senha-密码-パスワード", &hash).unwrap());
    }
}
