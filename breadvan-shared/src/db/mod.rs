//! Database layer for Bread Van
//!
//! # Modules
//!
//! - `pool`: PostgreSQL connection pool management with health checks
//! - `migrations`: Embedded schema migrations
//!
//! Models live in the `models` module at crate root level.
//!
//! # Example
//!
//! ```no_run
//! use breadvan_shared::db::pool::{create_pool, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig {
//!         url: std::env::var("DATABASE_URL")?,
//!         ..Default::default()
//!     };
//!
//!     let pool = create_pool(config).await?;
//!     breadvan_shared::db::migrations::run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

pub mod migrations;
pub mod pool;

pub use migrations::MIGRATOR;
