//! Argon2id password hashing
//!
//! Hashes are stored in PHC string format, so the parameters travel with the
//! hash and [`verify_password`] needs no configuration.
//!
//! Parameters follow the OWASP minimum for Argon2id: 19 MiB memory,
//! 2 iterations, 1 lane.
//!
//! # Example
//!
//! ```
//! use breadvan_shared::auth::password::{hash_password, verify_password};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hash = hash_password("adminpass")?;
//! assert!(verify_password("adminpass", &hash)?);
//! assert!(!verify_password("wrong", &hash)?);
//! # Ok(())
//! # }
//! ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Shortest password accepted for new accounts
pub const MIN_PASSWORD_LENGTH: usize = 6;

const M_COST_KIB: u32 = 19_456;
const T_COST: u32 = 2;
const P_COST: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = ParamsBuilder::new()
        .m_cost(M_COST_KIB)
        .t_cost(T_COST)
        .p_cost(P_COST)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    Ok(Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes a password with a fresh random salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a stored PHC hash
///
/// Returns `Ok(false)` on a mismatch and `Err` only when the stored hash is
/// unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Minimal acceptance rule for new passwords
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_format() {
        let hash = hash_password("bobpass").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=19456,t=2,p=1"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let first = hash_password("same_password").unwrap();
        let second = hash_password("same_password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_password() {
        let hash = hash_password("marypass").unwrap();

        assert!(verify_password("marypass", &hash).unwrap());
        assert!(!verify_password("MARYPASS", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(matches!(
            verify_password("password", "not-a-hash"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("bobpass").is_ok());
        assert!(validate_password_strength("abc").unwrap_err().contains("at least 6"));
        assert!(validate_password_strength("   ").is_err());
    }
}
