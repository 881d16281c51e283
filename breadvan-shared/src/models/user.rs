//! User model and database operations
//!
//! Every account lives in `users`; the `role` column discriminates between
//! admins, drivers, and residents. Drivers and residents carry an extra
//! profile row (see [`super::driver`] and [`super::resident`]).
//!
//! # Schema
//!
//! ```sql
//! CREATE TYPE user_role AS ENUM ('admin', 'driver', 'resident');
//!
//! CREATE TABLE users (
//!     id BIGSERIAL PRIMARY KEY,
//!     username VARCHAR(80) NOT NULL UNIQUE,
//!     password_hash VARCHAR(255) NOT NULL,
//!     role user_role NOT NULL,
//!     logged_in BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```
//!
//! # Example
//!
//! ```no_run
//! use breadvan_shared::models::user::{CreateUser, User, UserRole};
//! use sqlx::PgPool;
//!
//! # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
//! let user = User::create(&pool, CreateUser {
//!     username: "admin".to_string(),
//!     password_hash: "$argon2id$...".to_string(),
//!     role: UserRole::Admin,
//! }).await?;
//!
//! let found = User::find_by_username(&pool, "admin").await?;
//! assert_eq!(found.map(|u| u.id), Some(user.id));
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;

/// Role discriminator for a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Manages areas, streets, catalog items, and accounts
    Admin,

    /// Schedules and runs drives, manages stock
    Driver,

    /// Requests stops and receives notifications
    Resident,
}

impl UserRole {
    /// Converts role to its database/JSON string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Driver => "driver",
            UserRole::Resident => "resident",
        }
    }

    /// Path of the HTML dashboard for this role
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            UserRole::Admin => "/admin/dashboard",
            UserRole::Driver => "/driver/dashboard",
            UserRole::Resident => "/resident/dashboard",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            UserRole::Admin => "Admin",
            UserRole::Driver => "Driver",
            UserRole::Resident => "Resident",
        };
        f.write_str(label)
    }
}

/// User account
///
/// Passwords are stored as Argon2id hashes and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Login name, unique across all roles
    pub username: String,

    /// Argon2id password hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Role discriminator
    pub role: UserRole,

    /// Set on login, cleared on logout
    pub logged_in: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    /// Account role
    pub role: UserRole,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_username_key` if the username is taken.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, role, logged_in, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(executor)
        .await
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, logged_in, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a user by username (exact match)
    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, logged_in, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    /// Lists all users ordered by ID
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, logged_in, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(executor)
        .await
    }

    /// Renames a user, returning the updated row if it exists
    pub async fn update_username<'e, E>(
        executor: E,
        id: i64,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, role, logged_in, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_optional(executor)
        .await
    }

    /// Sets the logged-in flag
    pub async fn set_logged_in<'e, E>(
        executor: E,
        id: i64,
        logged_in: bool,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET logged_in = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, role, logged_in, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(logged_in)
        .fetch_optional(executor)
        .await
    }

    /// Deletes a user; profile rows, drives, stops and notifications cascade
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
