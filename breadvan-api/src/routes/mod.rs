//! JSON API route handlers
//!
//! - `health`: liveness and database check
//! - `auth`: login, refresh, resident self-registration, logout, whoami
//! - `admin`: areas, streets, catalog items and accounts
//! - `driver`: drives, stop decisions, resident updates, stock, inbox
//! - `resident`: street drives, stop requests, driver info, inbox

pub mod admin;
pub mod auth;
pub mod driver;
pub mod health;
pub mod resident;

use serde::Serialize;

/// Wrapper for list responses: `{ "items": [...], "count": n }`
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub count: usize,
}

impl<T> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}
