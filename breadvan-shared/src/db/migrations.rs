//! Database migration runner
//!
//! Migrations live in the workspace-level `migrations/` directory as
//! reversible pairs (`{version}_{name}.up.sql` / `.down.sql`) and are embedded
//! into the binary at compile time.

use sqlx::{migrate::MigrateDatabase, migrate::Migrator, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Embedded migrator, also used by `#[sqlx::test(migrator = ...)]`
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Number of migrations that have been applied
    pub applied_migrations: usize,

    /// Latest applied migration version (timestamp)
    pub latest_version: Option<i64>,

    /// Number of migrations embedded in this build
    pub known_migrations: usize,
}

impl MigrationStatus {
    /// Whether every embedded migration has been applied
    pub fn is_up_to_date(&self) -> bool {
        self.applied_migrations >= self.known_migrations
    }
}

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration fails to execute or the database
/// connection is lost during migration.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Gets the current migration status
///
/// # Errors
///
/// Returns an error if the migrations table cannot be queried
pub async fn get_migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    debug!("Checking migration status");

    let known_migrations = MIGRATOR
        .iter()
        .filter(|m| m.migration_type.is_up_migration())
        .count();

    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = '_sqlx_migrations'
        )",
    )
    .fetch_one(pool)
    .await?;

    if !table_exists {
        return Ok(MigrationStatus {
            applied_migrations: 0,
            latest_version: None,
            known_migrations,
        });
    }

    let (count, latest_version): (i64, Option<i64>) = sqlx::query_as(
        "SELECT COUNT(*), MAX(version) FROM _sqlx_migrations WHERE success = true",
    )
    .fetch_one(pool)
    .await?;

    Ok(MigrationStatus {
        applied_migrations: count as usize,
        latest_version,
        known_migrations,
    })
}

/// Creates the database if it doesn't exist
///
/// # Errors
///
/// Returns an error if the PostgreSQL server is unreachable or the role
/// lacks permission to create databases.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
