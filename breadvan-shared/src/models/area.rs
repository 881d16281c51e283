//! Area model
//!
//! Areas are the top of the geographic hierarchy. Deleting an area cascades
//! to its streets; it is refused while residents or drives still reference
//! one of those streets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// A named neighborhood
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Area {
    /// Creates a new area
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `areas_name_key` if the name exists.
    pub async fn create<'e, E>(executor: E, name: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Area>(
            "INSERT INTO areas (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Area>("SELECT id, name, created_at FROM areas WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Area>("SELECT id, name, created_at FROM areas WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Lists all areas ordered by ID
    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Area>("SELECT id, name, created_at FROM areas ORDER BY id")
            .fetch_all(executor)
            .await
    }

    /// Deletes an area and its streets
    ///
    /// Returns `false` if no area had that ID.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM areas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
