//! Authentication and role guards
//!
//! `/v1` routes answer unauthenticated callers with a JSON 401; the HTML
//! dashboards redirect them to the login page instead. Both accept the
//! bearer header or the `access_token` cookie.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Extension,
};
use breadvan_shared::{
    auth::{authorization::require_role, middleware::authenticate, middleware::AuthContext},
    models::user::UserRole,
};

pub const LOGIN_PATH: &str = "/web/login";

/// Validates the caller's token and stores the [`AuthContext`]
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Rejects callers whose role differs from the guarded route group's
///
/// Must sit inside [`require_auth`].
pub async fn require_route_role(
    State(role): State<UserRole>,
    Extension(auth): Extension<AuthContext>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    require_role(&auth, role)?;
    Ok(next.run(req).await)
}

/// Browser variant of [`require_auth`]: redirects to the login page
pub async fn require_web_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match authenticate(req.headers(), state.jwt_secret()) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, path = %req.uri().path(), "Redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}
