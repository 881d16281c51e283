//! Database models for Bread Van
//!
//! Each model owns its queries. Query functions take any `PgExecutor`, so the
//! same call works against the pool or inside a service transaction
//! (`&mut *tx`).
//!
//! # Models
//!
//! - `user`: Accounts with a role discriminator (admin, driver, resident)
//! - `area` / `street`: Geographic scoping hierarchy
//! - `driver` / `resident`: Role-specific profile rows keyed by user id
//! - `item`: Catalog entries
//! - `stock`: Per-driver stock levels
//! - `drive`: Scheduled delivery routes and their lifecycle
//! - `stop`: Resident stop requests on a drive
//! - `notification`: Capped per-user inbox

pub mod area;
pub mod drive;
pub mod driver;
pub mod item;
pub mod notification;
pub mod resident;
pub mod stock;
pub mod stop;
pub mod street;
pub mod user;
