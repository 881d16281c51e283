//! Stop requests
//!
//! A stop is a resident asking to be visited on a drive. At most one stop
//! exists per `(drive_id, resident_id)`; the driver who owns the drive
//! decides it.
//!
//! # State Machine
//!
//! ```text
//! Pending ──> Subscribed
//!    │
//!    └──> Rejected
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;

/// Stop decision state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stop_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StopStatus {
    /// Awaiting the driver's decision
    Pending,

    /// Approved by the driver
    #[serde(alias = "approved")]
    Subscribed,

    /// Declined by the driver
    Rejected,
}

impl StopStatus {
    pub fn can_transition_to(&self, next: StopStatus) -> bool {
        matches!(
            (self, next),
            (StopStatus::Pending, StopStatus::Subscribed) | (StopStatus::Pending, StopStatus::Rejected)
        )
    }
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopStatus::Pending => "Pending",
            StopStatus::Subscribed => "Subscribed",
            StopStatus::Rejected => "Rejected",
        };
        f.write_str(label)
    }
}

/// Stop row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Stop {
    pub id: i64,
    pub drive_id: i64,
    pub resident_id: i64,
    pub status: StopStatus,
    pub eta: Option<String>,
    pub status_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stop with the resident's address details, as shown to drivers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StopDetails {
    pub id: i64,
    pub drive_id: i64,
    pub resident_id: i64,
    pub resident_username: String,
    pub house_number: i32,
    pub status: StopStatus,
    pub eta: Option<String>,
    pub status_message: Option<String>,
}

const STOP_COLUMNS: &str =
    "id, drive_id, resident_id, status, eta, status_message, created_at, updated_at";

impl Stop {
    /// Inserts a `Pending` stop
    ///
    /// # Errors
    ///
    /// Unique violation on `stops_drive_resident_key` when the resident
    /// already has a stop on this drive.
    pub async fn create<'e, E>(
        executor: E,
        drive_id: i64,
        resident_id: i64,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Stop>(&format!(
            "INSERT INTO stops (drive_id, resident_id) VALUES ($1, $2) RETURNING {STOP_COLUMNS}"
        ))
        .bind(drive_id)
        .bind(resident_id)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Stop>(&format!("SELECT {STOP_COLUMNS} FROM stops WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds the resident's stop on a drive
    pub async fn find_for_pair<'e, E>(
        executor: E,
        drive_id: i64,
        resident_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Stop>(&format!(
            "SELECT {STOP_COLUMNS} FROM stops WHERE drive_id = $1 AND resident_id = $2"
        ))
        .bind(drive_id)
        .bind(resident_id)
        .fetch_optional(executor)
        .await
    }

    /// Records a driver's decision, overwriting the ETA and message only when given
    pub async fn decide<'e, E>(
        executor: E,
        id: i64,
        status: StopStatus,
        eta: Option<&str>,
        status_message: Option<&str>,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Stop>(&format!(
            r#"
            UPDATE stops
            SET status = $2,
                eta = COALESCE($3, eta),
                status_message = COALESCE($4, status_message),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STOP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(eta)
        .bind(status_message)
        .fetch_one(executor)
        .await
    }

    /// Updates ETA and/or status message without touching the decision
    pub async fn update_eta_status<'e, E>(
        executor: E,
        id: i64,
        eta: Option<&str>,
        status_message: Option<&str>,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Stop>(&format!(
            r#"
            UPDATE stops
            SET eta = COALESCE($2, eta),
                status_message = COALESCE($3, status_message),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STOP_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(eta)
        .bind(status_message)
        .fetch_one(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM stops WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl StopDetails {
    /// All stops on a drive, in request order
    pub async fn list_for_drive<'e, E>(
        executor: E,
        drive_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, StopDetails>(
            r#"
            SELECT s.id, s.drive_id, s.resident_id, u.username AS resident_username,
                   r.house_number, s.status, s.eta, s.status_message
            FROM stops s
            JOIN users u ON u.id = s.resident_id
            JOIN residents r ON r.user_id = s.resident_id
            WHERE s.drive_id = $1
            ORDER BY s.id
            "#,
        )
        .bind(drive_id)
        .fetch_all(executor)
        .await
    }
}
