//! Request authentication for Axum
//!
//! Credentials are read from the `Authorization: Bearer <token>` header, or
//! failing that from the `access_token` cookie set by the HTML login form.
//! On success an [`AuthContext`] is inserted into the request extensions.
//!
//! # Example
//!
//! ```no_run
//! use axum::{middleware, routing::get, Extension, Router};
//! use breadvan_shared::auth::middleware::{create_jwt_middleware, AuthContext};
//!
//! async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
//!     format!("user {} ({})", auth.user_id, auth.role)
//! }
//!
//! let app: Router = Router::new()
//!     .route("/whoami", get(whoami))
//!     .layer(middleware::from_fn(create_jwt_middleware("secret")));
//! ```

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::UserRole;

/// Name of the cookie carrying the access token for browser sessions
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: UserRole,
}

impl AuthContext {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }
}

#[derive(Debug)]
pub enum AuthError {
    /// No bearer header and no session cookie
    MissingCredentials,

    /// Authorization header present but not `Bearer <token>`
    InvalidFormat(String),

    /// Signature, expiry or token type check failed
    InvalidToken(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingCredentials => write!(f, "Missing credentials"),
            AuthError::InvalidFormat(msg) => write!(f, "{}", msg),
            AuthError::InvalidToken(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        };
        (status, self.to_string()).into_response()
    }
}

/// Reads a cookie value from the `Cookie` headers
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Finds the raw access token in a request's headers
///
/// The `Authorization` header wins over the cookie when both are present.
pub fn extract_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AuthError::InvalidFormat("Invalid authorization header".to_string()))?;
        return value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()));
    }

    cookie_value(headers, ACCESS_TOKEN_COOKIE).ok_or(AuthError::MissingCredentials)
}

/// Validates the request's access token and returns the caller
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let token = extract_token(headers)?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
    })?;

    Ok(AuthContext::new(claims.sub, claims.role))
}

/// JWT authentication middleware
///
/// # Errors
///
/// - 401 if credentials are missing, expired or forged
/// - 400 if the `Authorization` header is malformed
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth = authenticate(req.headers(), &secret)?;
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Captures the secret and returns a closure usable with `middleware::from_fn`
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}
