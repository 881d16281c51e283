//! Server-rendered HTML dashboards
//!
//! Each role gets one page. Form posts run a single action and re-render the
//! page with a success or error notice; the session lives in the
//! `access_token` cookie.

pub mod admin;
pub mod driver;
pub mod login;
pub mod resident;

use crate::error::ApiResult;
use askama::Template;
use axum::{
    response::{Html, IntoResponse, Redirect, Response},
    Extension,
};
use breadvan_shared::{
    auth::{jwt::TokenType, middleware::AuthContext, middleware::ACCESS_TOKEN_COOKIE},
    models::user::UserRole,
    services::{ServiceError, ServiceResult},
};

/// One-shot status line shown above a page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub class: &'static str,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: "success",
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            class: "error",
        }
    }

    /// Turns an action outcome into a notice
    ///
    /// User-facing failures become error notices; database and crypto
    /// failures propagate as a 500.
    pub fn from_outcome(outcome: ServiceResult<String>) -> ApiResult<Self> {
        match outcome {
            Ok(msg) => Ok(Self::success(msg)),
            Err(e) if e.is_user_facing() => Ok(Self::error(e.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Header data shared by every page
#[derive(Debug, Clone, Default)]
pub struct Chrome {
    pub username: String,
    pub notice: Notice,
}

pub fn render<T: Template>(page: &T) -> ApiResult<Response> {
    Ok(Html(page.render()?).into_response())
}

/// `Set-Cookie` value for a fresh browser session
pub fn session_cookie(token: &str, secure: bool) -> String {
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        ACCESS_TOKEN_COOKIE,
        token,
        TokenType::Access.default_expiration().num_seconds(),
        if secure { "; Secure" } else { "" }
    )
}

/// `Set-Cookie` value that removes the session
pub fn clear_session_cookie(secure: bool) -> String {
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
        ACCESS_TOKEN_COOKIE,
        if secure { "; Secure" } else { "" }
    )
}

/// Sends a caller on the wrong dashboard back to their own
pub fn check_role(auth: &AuthContext, role: UserRole) -> Result<(), Response> {
    if auth.role == role {
        Ok(())
    } else {
        tracing::debug!(user_id = auth.user_id, role = %auth.role, wanted = %role, "Wrong dashboard");
        Err(Redirect::to(auth.role.dashboard_path()).into_response())
    }
}

/// Reads a required integer form field
pub fn int_field<T: std::str::FromStr>(value: &Option<String>, what: &str) -> ServiceResult<T> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::invalid(format!("{} is required.", what)))?
        .parse()
        .map_err(|_| ServiceError::invalid(format!("{} must be a valid number.", what)))
}

/// Reads an optional text field, treating blank as absent
pub fn text_field(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

/// `/dashboard`: sends the user to their role's page
pub async fn dashboard(Extension(auth): Extension<AuthContext>) -> Redirect {
    Redirect::to(auth.role.dashboard_path())
}
