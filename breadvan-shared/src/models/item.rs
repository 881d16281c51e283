//! Catalog items
//!
//! Items are shared across drivers; per-driver quantities live in
//! [`super::stock`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,

    /// Unit price, never negative
    pub price: Decimal,

    pub description: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateItem {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Item {
    /// Inserts a catalog item
    ///
    /// # Errors
    ///
    /// - Unique violation on `items_name_key`
    /// - Check violation if `price` is negative
    pub async fn create<'e, E>(executor: E, data: CreateItem) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, price, description, tags)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, price, description, tags, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.price)
        .bind(data.description)
        .bind(data.tags)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, price, description, tags, created_at FROM items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn find_by_name<'e, E>(executor: E, name: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, price, description, tags, created_at FROM items WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(executor)
        .await
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            "SELECT id, name, price, description, tags, created_at FROM items ORDER BY id",
        )
        .fetch_all(executor)
        .await
    }

    /// Overwrites the unit price
    pub async fn set_price<'e, E>(
        executor: E,
        id: i64,
        price: Decimal,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Item>(
            r#"
            UPDATE items SET price = $2
            WHERE id = $1
            RETURNING id, name, price, description, tags, created_at
            "#,
        )
        .bind(id)
        .bind(price)
        .fetch_optional(executor)
        .await
    }

    /// Deletes an item; stock rows referencing it cascade
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
