//! Per-driver stock levels
//!
//! One row per `(driver_id, item_id)`; quantity is never negative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// Raw stock row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DriverStock {
    pub id: i64,
    pub driver_id: i64,
    pub item_id: i64,
    pub quantity: i32,
    pub updated_at: DateTime<Utc>,
}

/// A stock row joined with its catalog item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockLine {
    pub id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub price: Decimal,
    pub quantity: i32,
}

impl DriverStock {
    /// Sets the quantity for a driver and item, inserting the row if needed
    pub async fn upsert<'e, E>(
        executor: E,
        driver_id: i64,
        item_id: i64,
        quantity: i32,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, DriverStock>(
            r#"
            INSERT INTO driver_stock (driver_id, item_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (driver_id, item_id)
            DO UPDATE SET quantity = EXCLUDED.quantity, updated_at = NOW()
            RETURNING id, driver_id, item_id, quantity, updated_at
            "#,
        )
        .bind(driver_id)
        .bind(item_id)
        .bind(quantity)
        .fetch_one(executor)
        .await
    }

    /// Removes a stock row owned by `driver_id`
    pub async fn delete<'e, E>(executor: E, driver_id: i64, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM driver_stock WHERE id = $1 AND driver_id = $2")
            .bind(id)
            .bind(driver_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl StockLine {
    pub async fn list_for_driver<'e, E>(
        executor: E,
        driver_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, StockLine>(
            r#"
            SELECT ds.id, ds.item_id, i.name AS item_name, i.price, ds.quantity
            FROM driver_stock ds
            JOIN items i ON i.id = ds.item_id
            WHERE ds.driver_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(driver_id)
        .fetch_all(executor)
        .await
    }
}
