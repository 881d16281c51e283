//! Resident profile
//!
//! A resident is a [`User`](super::user::User) with role `resident` plus a
//! row in `residents` pinning them to an area, a street, and a house number.

use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;

/// A resident account joined with its profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Resident {
    pub id: i64,
    pub username: String,
    pub area_id: i64,
    pub street_id: i64,
    pub house_number: i32,
}

const SELECT_RESIDENT: &str = r#"
    SELECT u.id, u.username, r.area_id, r.street_id, r.house_number
    FROM residents r
    JOIN users u ON u.id = r.user_id
"#;

impl Resident {
    /// Attaches a resident profile to an existing user
    ///
    /// The caller checks that the street belongs to the area; the table only
    /// enforces that both exist and that `house_number > 0`.
    pub async fn create_profile<'e, E>(
        executor: E,
        user_id: i64,
        area_id: i64,
        street_id: i64,
        house_number: i32,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO residents (user_id, area_id, street_id, house_number)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(area_id)
        .bind(street_id)
        .bind(house_number)
        .execute(executor)
        .await?;

        Ok(())
    }

    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Resident>(&format!("{SELECT_RESIDENT} WHERE u.id = $1"))
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
        sqlx::query_as::<_, Resident>(&format!("{SELECT_RESIDENT} WHERE u.username = $1"))
            .bind(username)
            .fetch_optional(executor)
            .await
    }

    pub async fn list<'e, E>(executor: E) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Resident>(&format!("{SELECT_RESIDENT} ORDER BY u.id"))
            .fetch_all(executor)
            .await
    }

    /// Everyone living on a street, used to fan out drive notifications
    pub async fn list_by_street<'e, E>(
        executor: E,
        street_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Resident>(&format!("{SELECT_RESIDENT} WHERE r.street_id = $1 ORDER BY u.id"))
            .bind(street_id)
            .fetch_all(executor)
            .await
    }
}
