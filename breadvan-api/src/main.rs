//! # Bread Van API Server
//!
//! Serves the JSON API under `/v1` and the role dashboards for browsers.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/breadvan \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p breadvan-api
//! ```

use breadvan_api::{
    app::{build_router, AppState},
    config::Config,
};
use breadvan_shared::{
    db::{migrations, pool},
    services::seed,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "breadvan_api=debug,breadvan_shared=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Bread Van API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    if config.startup.auto_migrate {
        migrations::run_migrations(&db).await?;
    }

    if config.startup.auto_init {
        let summary = seed::initialize(&db).await?;
        tracing::warn!(?summary, "Database reset to demo data");
    }

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(db.clone(), config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received, exiting...");
}
