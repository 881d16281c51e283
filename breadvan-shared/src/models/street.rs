//! Street model
//!
//! A street belongs to exactly one area, and `(area_id, name)` is unique.
//! Residents live on a street and drives target one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// A street inside an area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Street {
    pub id: i64,
    pub area_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Street {
    /// Creates a street in an area
    ///
    /// # Errors
    ///
    /// - Foreign key violation if the area does not exist
    /// - Unique violation on `streets_area_name_key` for a duplicate name in the same area
    pub async fn create<'e, E>(executor: E, area_id: i64, name: &str) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Street>(
            r#"
            INSERT INTO streets (area_id, name)
            VALUES ($1, $2)
            RETURNING id, area_id, name, created_at
            "#,
        )
        .bind(area_id)
        .bind(name)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Street>(
            "SELECT id, area_id, name, created_at FROM streets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Finds a street only if it belongs to the given area
    pub async fn find_in_area<'e, E>(
        executor: E,
        area_id: i64,
        street_id: i64,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Street>(
            "SELECT id, area_id, name, created_at FROM streets WHERE id = $1 AND area_id = $2",
        )
        .bind(street_id)
        .bind(area_id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_name<'e, E>(
        executor: E,
        area_id: i64,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Street>(
            "SELECT id, area_id, name, created_at FROM streets WHERE area_id = $1 AND name = $2",
        )
        .bind(area_id)
        .bind(name)
        .fetch_optional(executor)
        .await
    }

    /// Lists streets, optionally restricted to one area
    pub async fn list<'e, E>(executor: E, area_id: Option<i64>) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Street>(
            r#"
            SELECT id, area_id, name, created_at
            FROM streets
            WHERE $1::BIGINT IS NULL OR area_id = $1
            ORDER BY area_id, id
            "#,
        )
        .bind(area_id)
        .fetch_all(executor)
        .await
    }

    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM streets WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
