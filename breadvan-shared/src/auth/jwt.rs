//! JWT issuing and validation
//!
//! Tokens are HS256-signed and carry the user ID and role, so the API can
//! route a request to the right dashboard without a database round trip.
//! The role is re-checked against the database on login and refresh only.
//!
//! - Access tokens live 24 hours and authenticate every request.
//! - Refresh tokens live 30 days and can only be exchanged for a new access token.
//!
//! # Example
//!
//! ```
//! use breadvan_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
//! use breadvan_shared::models::user::UserRole;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = "a-secret-that-is-at-least-32-bytes!";
//! let claims = Claims::new(42, UserRole::Driver, TokenType::Access);
//! let token = create_token(&claims, secret)?;
//!
//! let validated = validate_access_token(&token, secret)?;
//! assert_eq!(validated.sub, 42);
//! assert_eq!(validated.role, UserRole::Driver);
//! # Ok(())
//! # }
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::models::user::UserRole;

/// Value of the `iss` claim on every token
pub const ISSUER: &str = "breadvan";

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to create token: {0}")]
    CreateError(String),

    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    #[error("Token has expired")]
    Expired,

    /// Access token presented where a refresh token was expected, or vice versa
    #[error("Expected {expected} token")]
    WrongType { expected: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Token claims
///
/// `sub` is the user ID; `role` is copied from the user row at issue time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub role: UserRole,
    pub token_type: TokenType,
}

impl Claims {
    pub fn new(user_id: i64, role: UserRole, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, role, token_type, token_type.default_expiration())
    }

    pub fn with_expiration(
        user_id: i64,
        role: UserRole,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + expires_in).timestamp(),
            nbf: now.timestamp(),
            role,
            token_type,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Access and refresh token pair handed out on login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl TokenPair {
    /// Issues a fresh pair for a user
    pub fn issue(user_id: i64, role: UserRole, secret: &str) -> Result<Self, JwtError> {
        let access = Claims::new(user_id, role, TokenType::Access);
        let refresh = Claims::new(user_id, role, TokenType::Refresh);

        Ok(Self {
            access_token: create_token(&access, secret)?,
            refresh_token: create_token(&refresh, secret)?,
            token_type: "Bearer",
            expires_in: TokenType::Access.default_expiration().num_seconds(),
        })
    }
}

/// Signs claims with HS256
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| JwtError::CreateError(e.to_string()))
}

/// Verifies signature, expiry, not-before and issuer, returning the claims
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::ValidationError(e.to_string()),
        })
}

pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;
    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongType { expected: "access" });
    }
    Ok(claims)
}

pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;
    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::WrongType { expected: "refresh" });
    }
    Ok(claims)
}
