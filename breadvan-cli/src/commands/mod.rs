//! Command implementations for the breadvan CLI

pub mod admin;
pub mod db;
pub mod driver;
pub mod resident;
pub mod user;

pub use admin::run_admin;
pub use db::run_db;
pub use driver::run_driver;
pub use resident::run_resident;
pub use user::run_user;

use anyhow::{ensure, Result};
use breadvan_shared::{
    models::{
        drive::DriveDetails,
        stock::StockLine,
        user::{User, UserRole},
    },
    schedule::format_time,
    services::user::get_user_by_username,
};
use serde::Serialize;
use sqlx::PgPool;

/// Where command results go: plain lines or pretty JSON on stdout
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints one record
    pub fn one<T: Serialize>(&self, value: &T, line: impl FnOnce(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", line(value));
        }
        Ok(())
    }

    /// Prints a list, one line per record
    pub fn many<T: Serialize>(&self, values: &[T], line: impl Fn(&T) -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(values)?);
        } else if values.is_empty() {
            println!("(none)");
        } else {
            for value in values {
                println!("{}", line(value));
            }
        }
        Ok(())
    }

    /// Prints a confirmation message
    pub fn message(&self, text: &str) -> Result<()> {
        if self.json {
            println!("{}", serde_json::json!({ "message": text }));
        } else {
            println!("{}", text);
        }
        Ok(())
    }
}

/// Resolves `--as <username>` to a user holding `role`
pub async fn acting_user(pool: &PgPool, username: &str, role: UserRole) -> Result<User> {
    let user = get_user_by_username(pool, username).await?;
    ensure!(
        user.role == role,
        "User '{}' is a {}, not a {}.",
        user.username,
        user.role,
        role
    );
    tracing::debug!(user_id = user.id, role = %role, "Acting user resolved");
    Ok(user)
}

pub(crate) fn drive_line(drive: &DriveDetails) -> String {
    format!(
        "#{} {} {} {}, {} by {} [{}]",
        drive.id,
        drive.scheduled_date,
        format_time(drive.scheduled_time),
        drive.street_name,
        drive.area_name,
        drive.driver_username,
        drive.status
    )
}

pub(crate) fn stock_line(line: &StockLine) -> String {
    format!(
        "#{} {} x{} @ ${} (item {})",
        line.id, line.item_name, line.quantity, line.price, line.item_id
    )
}
