//! breadvan CLI - administration and role actions against the Bread Van database
//!
//! Runs the same domain operations as the HTTP API, directly on Postgres:
//! - Database setup (`db migrate`, `db init`, `db seed`)
//! - Account management (`user`)
//! - Geography, catalog and accounts (`admin`)
//! - Drive scheduling, stop decisions and stock (`driver --as <username>`)
//! - Stop requests and inbox (`resident --as <username>`)

use anyhow::{Context, Result};
use breadvan_shared::db::{
    migrations::ensure_database_exists,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "breadvan",
    author,
    version,
    about = "Bread van scheduling and notifications from the command line"
)]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    /// Print results as JSON instead of plain lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply migrations, reset demo data or add demo areas
    Db(commands::db::DbArgs),
    /// Create, list, rename, log in and log out users
    User(commands::user::UserArgs),
    /// Manage areas, streets, catalog items, drivers and residents
    Admin(commands::admin::AdminArgs),
    /// Act as a driver: drives, stops and stock
    Driver(commands::driver::DriverArgs),
    /// Act as a resident: stop requests, inbox and driver menus
    Resident(commands::resident::ResidentArgs),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("breadvan=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let url = cli
        .database_url
        .context("DATABASE_URL is not set (pass --database-url or set it in .env)")?;
    if matches!(cli.command, Commands::Db(_)) {
        ensure_database_exists(&url)
            .await
            .context("Failed to create the database")?;
    }
    let pool = create_pool(DatabaseConfig::single(url))
        .await
        .context("Failed to connect to the database")?;

    let out = commands::Output::new(cli.json);
    let result = match cli.command {
        Commands::Db(args) => commands::run_db(&pool, out, args).await,
        Commands::User(args) => commands::run_user(&pool, out, args).await,
        Commands::Admin(args) => commands::run_admin(&pool, out, args).await,
        Commands::Driver(args) => commands::run_driver(&pool, out, args).await,
        Commands::Resident(args) => commands::run_resident(&pool, out, args).await,
    };

    close_pool(pool).await;
    result
}
