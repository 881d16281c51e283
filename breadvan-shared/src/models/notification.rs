//! Notification inbox
//!
//! Every user has an ordered inbox of timestamped text messages capped at
//! [`MAX_INBOX_SIZE`]. Pushing past the cap evicts the oldest entries.
//!
//! [`Notification::push`] performs the insert and the trim in the caller's
//! executor, so a service that pushes inside its transaction either commits
//! both or neither. Reads go through [`Inbox`], which applies the same
//! rule in memory and renders the lines.
//!
//! Entries render as `[YYYY:MM:DD:HH:MM:SS]: message` in the host's local time.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::collections::VecDeque;

/// Maximum number of entries kept per inbox
pub const MAX_INBOX_SIZE: usize = 20;

const TIMESTAMP_FORMAT: &str = "%Y:%m:%d:%H:%M:%S";

/// Renders one inbox line, stamped in local time
pub fn format_entry(created_at: DateTime<Utc>, message: &str) -> String {
    format!(
        "[{}]: {}",
        created_at.with_timezone(&Local).format(TIMESTAMP_FORMAT),
        message
    )
}

/// Stored notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Appends a message to a user's inbox and trims it to the newest entries
    ///
    /// Takes a connection rather than a generic executor because it issues
    /// two statements.
    pub async fn push(
        conn: &mut sqlx::PgConnection,
        user_id: i64,
        message: &str,
    ) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, message)
            VALUES ($1, $2)
            RETURNING id, user_id, message, created_at
            "#,
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE user_id = $1
              AND id NOT IN (
                  SELECT id FROM notifications
                  WHERE user_id = $1
                  ORDER BY id DESC
                  LIMIT $2
              )
            "#,
        )
        .bind(user_id)
        .bind(MAX_INBOX_SIZE as i64)
        .execute(&mut *conn)
        .await?;

        Ok(notification)
    }

    /// The user's inbox, oldest first
    pub async fn list_for_user<'e, E>(executor: E, user_id: i64) -> Result<Vec<Self>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, message, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(executor)
        .await
    }

    /// Whether the inbox already holds an entry with this exact body
    pub async fn body_exists<'e, E>(
        executor: E,
        user_id: i64,
        message: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM notifications WHERE user_id = $1 AND message = $2)",
        )
        .bind(user_id)
        .bind(message)
        .fetch_one(executor)
        .await
    }
}

/// In-memory inbox with the same cap and eviction order as the table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inbox {
    entries: VecDeque<(DateTime<Utc>, String)>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, evicting the oldest entry once full
    pub fn push(&mut self, at: DateTime<Utc>, message: impl Into<String>) {
        if self.entries.len() == MAX_INBOX_SIZE {
            self.entries.pop_front();
        }
        self.entries.push_back((at, message.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rendered entries, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(at, message)| format_entry(*at, message))
            .collect()
    }
}

impl From<Vec<Notification>> for Inbox {
    fn from(notifications: Vec<Notification>) -> Self {
        let mut inbox = Inbox::new();
        for n in notifications {
            inbox.push(n.created_at, n.message);
        }
        inbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 5, second).unwrap()
    }

    fn local_stamp(at: DateTime<Utc>) -> String {
        at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
    }

    #[test]
    fn test_format_entry_uses_local_time() {
        let line = format_entry(at(7), "hello");
        assert_eq!(line, format!("[{}]: hello", local_stamp(at(7))));

        // Only the hour and minute may shift with the zone
        assert!(line.ends_with(":07]: hello"));
        assert_eq!(line.len(), "[2025:03:14:09:05:07]: hello".len());
    }

    #[test]
    fn test_inbox_evicts_oldest_past_cap() {
        let mut inbox = Inbox::new();
        for i in 0..(MAX_INBOX_SIZE + 1) {
            inbox.push(at(0), format!("msg {i}"));
        }

        assert_eq!(inbox.len(), MAX_INBOX_SIZE);
        let lines = inbox.lines();
        assert!(lines[0].ends_with("msg 1"));
        assert!(lines[MAX_INBOX_SIZE - 1].ends_with(&format!("msg {}", MAX_INBOX_SIZE)));
    }

    #[test]
    fn test_from_notifications_keeps_order() {
        let rows = vec![
            Notification { id: 1, user_id: 9, message: "a".into(), created_at: at(1) },
            Notification { id: 2, user_id: 9, message: "b".into(), created_at: at(2) },
        ];
        let inbox = Inbox::from(rows);
        assert_eq!(
            inbox.lines(),
            vec![
                format!("[{}]: a", local_stamp(at(1))),
                format!("[{}]: b", local_stamp(at(2))),
            ]
        );
    }
}
