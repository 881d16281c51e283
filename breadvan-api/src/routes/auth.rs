//! Authentication endpoints
//!
//! - `POST /v1/auth/login` - Login and get tokens
//! - `POST /v1/auth/refresh` - Exchange a refresh token for a new pair
//! - `POST /v1/auth/register` - Resident self-registration
//! - `POST /v1/auth/logout` - Clear the logged-in flag (issued tokens stay valid until expiry)
//! - `GET  /v1/auth/me` - Current user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use breadvan_shared::{
    auth::{jwt::TokenPair, middleware::AuthContext, password},
    models::user::User,
    services::{
        resident::{self, NewResident},
        user,
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Tokens plus the account they were issued for
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,

    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Resident self-registration
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    pub password: String,

    pub area_id: i64,

    pub street_id: i64,

    #[validate(range(min = 1, message = "House number must be a positive number."))]
    pub house_number: i32,
}

/// Login endpoint
///
/// ```text
/// POST /v1/auth/login
/// { "username": "mary", "password": "marypass" }
/// ```
///
/// A driver logging in becomes `available`.
///
/// # Errors
///
/// - `401 Unauthorized`: unknown user or wrong password
/// - `422 Unprocessable Entity`: empty fields
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<SessionResponse>> {
    req.validate()?;

    let (user, tokens) =
        user::login(&state.db, &req.username, &req.password, state.jwt_secret()).await?;

    Ok(Json(SessionResponse { user, tokens }))
}

/// Issues a fresh token pair
///
/// # Errors
///
/// - `401 Unauthorized`: token expired, forged, an access token, or the user is gone
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let tokens = user::refresh(&state.db, &req.refresh_token, state.jwt_secret()).await?;
    Ok(Json(tokens))
}

/// Creates a resident account and logs it in
///
/// ```text
/// POST /v1/auth/register
/// {
///   "username": "alice",
///   "password": "alicepass",
///   "area_id": 1,
///   "street_id": 2,
///   "house_number": 48
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: the street is not in the area
/// - `409 Conflict`: username taken
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    req.validate()?;

    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let new_resident = resident::create_resident(
        &state.db,
        NewResident {
            username: req.username.clone(),
            password: req.password.clone(),
            area_id: req.area_id,
            street_id: req.street_id,
            house_number: req.house_number,
        },
    )
    .await?;

    tracing::info!(resident_id = new_resident.id, "Resident registered");

    let (user, tokens) =
        user::login(&state.db, &req.username, &req.password, state.jwt_secret()).await?;

    Ok((StatusCode::CREATED, Json(SessionResponse { user, tokens })))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    Ok(Json(user::logout(&state.db, auth.user_id).await?))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<User>> {
    Ok(Json(user::get_user(&state.db, auth.user_id).await?))
}
