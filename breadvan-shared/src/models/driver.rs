//! Driver profile
//!
//! A driver is a [`User`](super::user::User) with role `driver` plus a row in
//! `drivers` holding the availability status and the current location.
//! Queries here join both tables so callers get one flat [`Driver`].

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;

/// Driver availability
///
/// - `Offline`: logged out
/// - `Available`: logged in, not on a drive
/// - `Busy`: running a drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "driver_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Offline,
    Available,
    Busy,
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DriverStatus::Offline => "Offline",
            DriverStatus::Available => "Available",
            DriverStatus::Busy => "Busy",
        };
        f.write_str(label)
    }
}

/// A driver account joined with its profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Driver {
    pub id: i64,
    pub username: String,
    pub status: DriverStatus,
    pub area_id: Option<i64>,
    pub street_id: Option<i64>,
    pub logged_in: bool,
}

const SELECT_DRIVER: &str = r#"
    SELECT u.id, u.username, d.status, d.area_id, d.street_id, u.logged_in
    FROM drivers d
    JOIN users u ON u.id = d.user_id
"#;

impl Driver {
    /// Attaches a driver profile to an existing user
    pub async fn create_profile<'e, E>(
        executor: E,
        user_id: i64,
        status: DriverStatus,
        area_id: Option<i64>,
        street_id: Option<i64>,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "INSERT INTO drivers (user_id, status, area_id, street_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(user_id)
        .bind(status)
        .bind(area_id)
        .bind(street_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Driver>(&format!("{SELECT_DRIVER} WHERE u.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Driver>(&format!("{SELECT_DRIVER} WHERE u.username = $1"))
            .bind(username)
            .fetch_optional(executor)
            .await
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Driver>(&format!("{SELECT_DRIVER} ORDER BY u.id"))
            .fetch_all(executor)
            .await
    }

    pub async fn set_status<'e, E>(
        executor: E,
        id: i64,
        status: DriverStatus,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE drivers SET status = $2 WHERE user_id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;

        Ok(())
    }

    /// Moves the driver to a drive's area and street
    pub async fn set_location<'e, E>(
        executor: E,
        id: i64,
        area_id: i64,
        street_id: i64,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("UPDATE drivers SET area_id = $2, street_id = $3 WHERE user_id = $1")
            .bind(id)
            .bind(area_id)
            .bind(street_id)
            .execute(executor)
            .await?;

        Ok(())
    }
}
