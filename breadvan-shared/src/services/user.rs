//! Accounts and sessions

use sqlx::{PgConnection, PgPool};

use super::{required, unique_as_conflict, ServiceError, ServiceResult, MAX_USERNAME_LEN};
use crate::auth::{
    jwt::{validate_refresh_token, TokenPair},
    password::{hash_password, validate_password_strength, verify_password},
};
use crate::models::{
    driver::{Driver, DriverStatus},
    user::{CreateUser, User, UserRole},
};

pub const USERNAME_TAKEN: &str = "Username already taken.";
const BAD_CREDENTIALS: &str = "Invalid username or password.";

/// Validates, hashes and inserts a user row on the given connection
pub(crate) async fn insert_user(
    conn: &mut PgConnection,
    username: &str,
    password: &str,
    role: UserRole,
) -> ServiceResult<User> {
    let username = required(username, "Username", MAX_USERNAME_LEN)?;
    validate_password_strength(password).map_err(ServiceError::Invalid)?;

    if User::find_by_username(&mut *conn, &username).await?.is_some() {
        return Err(ServiceError::conflict(USERNAME_TAKEN));
    }

    let password_hash = hash_password(password)?;
    User::create(
        &mut *conn,
        CreateUser {
            username,
            password_hash,
            role,
        },
    )
    .await
    .map_err(|e| unique_as_conflict(e, USERNAME_TAKEN))
}

/// Creates a bare account; drivers and residents go through their own services
pub async fn create_user(
    pool: &PgPool,
    username: &str,
    password: &str,
    role: UserRole,
) -> ServiceResult<User> {
    if role != UserRole::Admin {
        return Err(ServiceError::invalid(
            "Drivers and residents need a profile; use the driver or resident commands.",
        ));
    }

    let mut tx = pool.begin().await?;
    let user = insert_user(&mut tx, username, password, role).await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, username = %user.username, "User created");
    Ok(user)
}

pub async fn get_user(pool: &PgPool, user_id: i64) -> ServiceResult<User> {
    User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found."))
}

pub async fn get_user_by_username(pool: &PgPool, username: &str) -> ServiceResult<User> {
    User::find_by_username(pool, username.trim())
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found."))
}

pub async fn list_users(pool: &PgPool) -> ServiceResult<Vec<User>> {
    Ok(User::list(pool).await?)
}

pub async fn update_username(pool: &PgPool, user_id: i64, username: &str) -> ServiceResult<User> {
    let username = required(username, "Username", MAX_USERNAME_LEN)?;

    let mut tx = pool.begin().await?;
    if let Some(existing) = User::find_by_username(&mut *tx, &username).await? {
        if existing.id != user_id {
            return Err(ServiceError::conflict(USERNAME_TAKEN));
        }
    }

    let user = User::update_username(&mut *tx, user_id, &username)
        .await
        .map_err(|e| unique_as_conflict(e, USERNAME_TAKEN))?
        .ok_or_else(|| ServiceError::not_found("User not found."))?;
    tx.commit().await?;

    Ok(user)
}

/// Checks credentials, marks the user logged in and issues tokens
///
/// A driver logging in becomes `Available`.
pub async fn login(
    pool: &PgPool,
    username: &str,
    password: &str,
    jwt_secret: &str,
) -> ServiceResult<(User, TokenPair)> {
    let mut tx = pool.begin().await?;

    let user = User::find_by_username(&mut *tx, username.trim())
        .await?
        .ok_or_else(|| ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !verify_password(password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let user = User::set_logged_in(&mut *tx, user.id, true)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if user.role == UserRole::Driver {
        Driver::set_status(&mut *tx, user.id, DriverStatus::Available).await?;
    }

    let tokens = TokenPair::issue(user.id, user.role, jwt_secret)?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok((user, tokens))
}

/// Clears the logged-in flag; a driver goes `Offline`
///
/// Access tokens are stateless and `logged_in` is not checked when one is
/// verified, so tokens issued before logout keep working until they expire.
pub async fn logout(pool: &PgPool, user_id: i64) -> ServiceResult<User> {
    let mut tx = pool.begin().await?;

    let user = User::set_logged_in(&mut *tx, user_id, false)
        .await?
        .ok_or_else(|| ServiceError::not_found("User not found."))?;

    if user.role == UserRole::Driver {
        Driver::set_status(&mut *tx, user.id, DriverStatus::Offline).await?;
    }
    tx.commit().await?;

    tracing::info!(user_id = user.id, "User logged out");
    Ok(user)
}

/// Exchanges a refresh token for a new pair, re-reading the role
pub async fn refresh(pool: &PgPool, refresh_token: &str, jwt_secret: &str) -> ServiceResult<TokenPair> {
    let claims = validate_refresh_token(refresh_token, jwt_secret)
        .map_err(|e| ServiceError::Unauthorized(e.to_string()))?;

    let user = User::find_by_id(pool, claims.sub)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("User no longer exists.".to_string()))?;

    Ok(TokenPair::issue(user.id, user.role, jwt_secret)?)
}
