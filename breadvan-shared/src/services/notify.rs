//! Notification delivery
//!
//! Writes go through the caller's connection so they share its transaction.

use sqlx::{PgConnection, PgPool};

use super::ServiceResult;
use crate::models::{
    notification::{Inbox, Notification},
    resident::Resident,
};

/// Appends a message to one user's inbox
pub async fn notify(
    conn: &mut PgConnection,
    user_id: i64,
    message: &str,
) -> Result<Notification, sqlx::Error> {
    tracing::debug!(user_id, "Notification queued");
    Notification::push(conn, user_id, message).await
}

/// Appends a message only if the same body is not already in the inbox
///
/// Returns whether the message was added.
pub async fn notify_once(
    conn: &mut PgConnection,
    user_id: i64,
    message: &str,
) -> Result<bool, sqlx::Error> {
    if Notification::body_exists(&mut *conn, user_id, message).await? {
        return Ok(false);
    }
    notify(conn, user_id, message).await?;
    Ok(true)
}

/// Notifies every resident living on a street, returning how many were reached
pub async fn notify_street(
    conn: &mut PgConnection,
    street_id: i64,
    message: &str,
) -> Result<usize, sqlx::Error> {
    let residents = Resident::list_by_street(&mut *conn, street_id).await?;
    for resident in &residents {
        notify(&mut *conn, resident.id, message).await?;
    }

    tracing::info!(street_id, recipients = residents.len(), "Street notified");
    Ok(residents.len())
}

/// A user's inbox as rendered lines, oldest first
pub async fn inbox(pool: &PgPool, user_id: i64) -> ServiceResult<Vec<String>> {
    let entries = Notification::list_for_user(pool, user_id).await?;
    Ok(Inbox::from(entries).lines())
}
