//! Browser login and logout

use super::{clear_session_cookie, render, session_cookie, Chrome, Notice};
use crate::{app::AppState, error::ApiResult};
use askama::Template;
use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use breadvan_shared::{
    auth::middleware::authenticate,
    services::{user, ServiceError},
};
use serde::Deserialize;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub chrome: Chrome,
    pub username: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn login_page_with(notice: Notice, username: &str) -> ApiResult<Response> {
    render(&LoginPage {
        chrome: Chrome {
            notice,
            ..Default::default()
        },
        username: username.to_string(),
    })
}

pub async fn login_page() -> ApiResult<Response> {
    login_page_with(Notice::default(), "")
}

/// Verifies the form and starts a cookie session
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Response> {
    let username = form.username.trim();
    if username.is_empty() || form.password.is_empty() {
        return login_page_with(
            Notice::error("Please enter both username and password."),
            username,
        );
    }

    match user::login(&state.db, username, &form.password, state.jwt_secret()).await {
        Ok((user, tokens)) => {
            let cookie = session_cookie(&tokens.access_token, state.secure_cookies());
            Ok((
                [(header::SET_COOKIE, cookie)],
                Redirect::to(user.role.dashboard_path()),
            )
                .into_response())
        }
        Err(ServiceError::Unauthorized(msg)) => login_page_with(Notice::error(msg), username),
        Err(e) => Err(e.into()),
    }
}

/// Ends the session; works with or without a valid cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    if let Ok(auth) = authenticate(&headers, state.jwt_secret()) {
        match user::logout(&state.db, auth.user_id).await {
            Ok(_) | Err(ServiceError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let page = login_page_with(Notice::success("Logged out."), "")?;
    Ok((
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies()))],
        page,
    )
        .into_response())
}
