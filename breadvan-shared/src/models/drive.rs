//! Drive model and lifecycle
//!
//! A drive is one scheduled visit by a driver to a street.
//!
//! # State Machine
//!
//! ```text
//! Upcoming ──> InProgress ──> Completed
//!     │
//!     └──> Cancelled
//! ```
//!
//! Transitions are applied with a guarded `UPDATE ... WHERE status = <from>`
//! so a concurrent request that already moved the drive sees zero affected
//! rows. The partial unique index `drives_one_in_progress_per_driver` keeps a
//! driver on at most one in-progress drive.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;

/// Drive lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "drive_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DriveStatus {
    /// Scheduled, accepting stop requests
    Upcoming,

    /// Driver is out on the route
    InProgress,

    /// Finished normally (terminal)
    Completed,

    /// Called off before starting (terminal)
    Cancelled,
}

impl DriveStatus {
    /// Checks if this state is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriveStatus::Completed | DriveStatus::Cancelled)
    }

    /// Upcoming or in progress
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Validates a lifecycle transition
    pub fn can_transition_to(&self, next: DriveStatus) -> bool {
        matches!(
            (self, next),
            (DriveStatus::Upcoming, DriveStatus::InProgress)
                | (DriveStatus::Upcoming, DriveStatus::Cancelled)
                | (DriveStatus::InProgress, DriveStatus::Completed)
        )
    }
}

impl fmt::Display for DriveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DriveStatus::Upcoming => "Upcoming",
            DriveStatus::InProgress => "In Progress",
            DriveStatus::Completed => "Completed",
            DriveStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// Drive row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Drive {
    pub id: i64,
    pub driver_id: i64,
    pub area_id: i64,
    pub street_id: i64,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub status: DriveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A drive joined with the names needed to describe it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DriveDetails {
    pub id: i64,
    pub driver_id: i64,
    pub driver_username: String,
    pub area_id: i64,
    pub area_name: String,
    pub street_id: i64,
    pub street_name: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub status: DriveStatus,
}

/// Input for scheduling a drive
#[derive(Debug, Clone)]
pub struct CreateDrive {
    pub driver_id: i64,
    pub area_id: i64,
    pub street_id: i64,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
}

const DRIVE_COLUMNS: &str =
    "id, driver_id, area_id, street_id, scheduled_date, scheduled_time, status, created_at, updated_at";

const SELECT_DETAILS: &str = r#"
    SELECT d.id, d.driver_id, u.username AS driver_username,
           d.area_id, a.name AS area_name,
           d.street_id, s.name AS street_name,
           d.scheduled_date, d.scheduled_time, d.status
    FROM drives d
    JOIN users u ON u.id = d.driver_id
    JOIN areas a ON a.id = d.area_id
    JOIN streets s ON s.id = d.street_id
"#;

impl Drive {
    /// Inserts a new drive in `Upcoming`
    pub async fn create<'e, E>(executor: E, data: CreateDrive) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Drive>(&format!(
            r#"
            INSERT INTO drives (driver_id, area_id, street_id, scheduled_date, scheduled_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DRIVE_COLUMNS}
            "#
        ))
        .bind(data.driver_id)
        .bind(data.area_id)
        .bind(data.street_id)
        .bind(data.scheduled_date)
        .bind(data.scheduled_time)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Drive>(&format!("SELECT {DRIVE_COLUMNS} FROM drives WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Finds the driver's in-progress drive, if any
    pub async fn find_in_progress_for_driver<'e, E>(
        executor: E,
        driver_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Drive>(&format!(
            "SELECT {DRIVE_COLUMNS} FROM drives WHERE driver_id = $1 AND status = 'in_progress'"
        ))
        .bind(driver_id)
        .fetch_optional(executor)
        .await
    }

    /// Moves a drive from `from` to `to`, only if it is owned by `driver_id`
    ///
    /// Returns `None` when the drive does not exist, belongs to someone
    /// else, or is no longer in `from`.
    pub async fn transition<'e, E>(
        executor: E,
        id: i64,
        driver_id: i64,
        from: DriveStatus,
        to: DriveStatus,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        debug_assert!(from.can_transition_to(to));

        sqlx::query_as::<_, Drive>(&format!(
            r#"
            UPDATE drives
            SET status = $4, updated_at = NOW()
            WHERE id = $1 AND driver_id = $2 AND status = $3
            RETURNING {DRIVE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(driver_id)
        .bind(from)
        .bind(to)
        .fetch_optional(executor)
        .await
    }
}

impl DriveDetails {
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, DriveDetails>(&format!("{SELECT_DETAILS} WHERE d.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The driver's upcoming and in-progress drives, soonest first
    pub async fn list_active_for_driver<'e, E>(
        executor: E,
        driver_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, DriveDetails>(&format!(
            r#"{SELECT_DETAILS}
            WHERE d.driver_id = $1 AND d.status IN ('upcoming', 'in_progress')
            ORDER BY d.scheduled_date, d.scheduled_time, d.id"#
        ))
        .bind(driver_id)
        .fetch_all(executor)
        .await
    }

    /// Upcoming and in-progress drives targeting a street, soonest first
    pub async fn list_active_for_street<'e, E>(
        executor: E,
        street_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, DriveDetails>(&format!(
            r#"{SELECT_DETAILS}
            WHERE d.street_id = $1 AND d.status IN ('upcoming', 'in_progress')
            ORDER BY d.scheduled_date, d.scheduled_time, d.id"#
        ))
        .bind(street_id)
        .fetch_all(executor)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert!(DriveStatus::Upcoming.can_transition_to(DriveStatus::InProgress));
        assert!(DriveStatus::Upcoming.can_transition_to(DriveStatus::Cancelled));
        assert!(DriveStatus::InProgress.can_transition_to(DriveStatus::Completed));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!DriveStatus::Upcoming.can_transition_to(DriveStatus::Completed));
        assert!(!DriveStatus::InProgress.can_transition_to(DriveStatus::Cancelled));
        assert!(!DriveStatus::Completed.can_transition_to(DriveStatus::InProgress));
        assert!(!DriveStatus::Cancelled.can_transition_to(DriveStatus::Upcoming));
    }

    #[test]
    fn test_terminal_states() {
        assert!(DriveStatus::Completed.is_terminal());
        assert!(DriveStatus::Cancelled.is_terminal());
        assert!(DriveStatus::Upcoming.is_active());
        assert!(DriveStatus::InProgress.is_active());
    }

    #[test]
    fn test_display_uses_human_labels() {
        assert_eq!(DriveStatus::InProgress.to_string(), "In Progress");
        assert_eq!(
            serde_json::to_string(&DriveStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
