//! Database setup: migrations, demo reset and demo areas

use anyhow::{bail, Context, Result};
use breadvan_shared::{
    db::migrations::{get_migration_status, run_migrations},
    services::seed,
};
use clap::{Parser, Subcommand};
use serde_json::json;
use sqlx::PgPool;

use super::Output;

#[derive(Parser, Debug)]
pub struct DbArgs {
    #[command(subcommand)]
    pub command: DbCommand,
}

#[derive(Subcommand, Debug)]
pub enum DbCommand {
    /// Apply pending migrations
    Migrate,
    /// Show how many migrations are applied
    Status,
    /// Migrate, then replace ALL data with the demo dataset
    Init {
        /// Confirm that existing data will be deleted
        #[arg(long)]
        yes: bool,
    },
    /// Add the demo areas and streets that are missing
    Seed,
}

pub async fn run_db(pool: &PgPool, out: Output, args: DbArgs) -> Result<()> {
    match args.command {
        DbCommand::Migrate => {
            run_migrations(pool).await.context("Migration failed")?;
            out.message("Migrations applied.")
        }
        DbCommand::Status => {
            let status = get_migration_status(pool).await?;
            let value = json!({
                "applied": status.applied_migrations,
                "known": status.known_migrations,
                "latest_version": status.latest_version,
                "up_to_date": status.is_up_to_date(),
            });
            out.one(&value, |_| {
                format!(
                    "{}/{} migrations applied{}",
                    status.applied_migrations,
                    status.known_migrations,
                    if status.is_up_to_date() { "" } else { " (pending)" }
                )
            })
        }
        DbCommand::Init { yes } => {
            if !yes {
                bail!("`db init` deletes all data; re-run with --yes to continue.");
            }
            run_migrations(pool).await.context("Migration failed")?;
            let summary = seed::initialize(pool).await?;
            out.message(&format!(
                "Database initialized: {} users, {} areas, {} streets, {} drives, {} stops.",
                summary.users, summary.areas, summary.streets, summary.drives, summary.stops
            ))
        }
        DbCommand::Seed => {
            let added = seed::seed_demo_areas(pool).await?;
            out.message(&format!("Demo areas seeded: {} streets added.", added))
        }
    }
}
