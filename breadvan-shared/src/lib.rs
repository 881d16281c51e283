//! # Bread Van Shared Library
//!
//! This crate contains the data layer and domain logic shared by the Bread Van
//! API server and the `breadvan` command-line tool.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their queries
//! - `auth`: Password hashing, JWT tokens, and role checks
//! - `db`: Connection pool and embedded migrations
//! - `schedule`: Drive date/time parsing and the scheduling window
//! - `services`: Role-grouped domain operations (admin, driver, resident, user)

pub mod auth;
pub mod db;
pub mod models;
pub mod schedule;
pub mod services;

/// Current version of the Bread Van shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
