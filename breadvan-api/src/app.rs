//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use breadvan_api::{app::{build_router, AppState}, config::Config};
//! use sqlx::PgPool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPool::connect(&config.database.url).await?;
//! let app = build_router(AppState::new(pool, config));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    config::Config,
    middleware::{
        security::SecurityHeadersLayer,
        session::{require_auth, require_route_role, require_web_session},
    },
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use breadvan_shared::models::user::UserRole;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Whether session cookies carry the `Secure` attribute
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── /health                          public
/// ├── /v1/auth/{login,refresh,register} public
/// ├── /v1/auth/{logout,me}             any role
/// ├── /v1/admin/...                    Admin
/// ├── /v1/driver/...                   Driver
/// ├── /v1/resident/...                 Resident
/// ├── /web/login, /web/logout          public HTML
/// └── /dashboard, /{role}/dashboard    HTML, cookie session
/// ```
///
/// Unauthenticated `/v1` calls get a JSON 401; unauthenticated dashboard
/// visits are redirected to `/web/login`.
pub fn build_router(state: AppState) -> Router {
    use crate::{routes, web};

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_v1 = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/auth/register", post(routes::auth::register));

    let admin_routes = Router::new()
        .route(
            "/areas",
            get(routes::admin::list_areas).post(routes::admin::create_area),
        )
        .route("/areas/:id", delete(routes::admin::delete_area))
        .route(
            "/areas/:id/streets",
            get(routes::admin::list_area_streets).post(routes::admin::create_street),
        )
        .route(
            "/areas/:id/streets/:street_id",
            delete(routes::admin::delete_street),
        )
        .route("/streets", get(routes::admin::list_streets))
        .route(
            "/items",
            get(routes::admin::list_items).post(routes::admin::create_item),
        )
        .route("/items/:id", delete(routes::admin::delete_item))
        .route(
            "/drivers",
            get(routes::admin::list_drivers).post(routes::admin::create_driver),
        )
        .route("/drivers/:id", delete(routes::admin::delete_driver))
        .route(
            "/residents",
            get(routes::admin::list_residents).post(routes::admin::create_resident),
        )
        .route_layer(from_fn_with_state(UserRole::Admin, require_route_role));

    let driver_routes = Router::new()
        .route(
            "/drives",
            get(routes::driver::list_drives).post(routes::driver::schedule_drive),
        )
        .route("/drives/end", post(routes::driver::end_drive))
        .route("/drives/:id/start", post(routes::driver::start_drive))
        .route("/drives/:id/cancel", post(routes::driver::cancel_drive))
        .route("/drives/:id/stops", get(routes::driver::drive_stops))
        .route("/stops/:id/approve", post(routes::driver::approve_stop))
        .route("/stops/:id/reject", post(routes::driver::reject_stop))
        .route("/updates", post(routes::driver::send_update))
        .route(
            "/stock",
            get(routes::driver::view_stock).put(routes::driver::set_stock),
        )
        .route("/stock/:id", delete(routes::driver::remove_stock))
        .route("/inbox", get(routes::driver::inbox))
        .route_layer(from_fn_with_state(UserRole::Driver, require_route_role));

    let resident_routes = Router::new()
        .route("/drives", get(routes::resident::street_drives))
        .route(
            "/drives/:id/stop",
            post(routes::resident::request_stop).delete(routes::resident::cancel_stop),
        )
        .route("/inbox", get(routes::resident::inbox))
        .route("/drivers/:id", get(routes::resident::driver_stats))
        .route("/drivers/:id/stock", get(routes::resident::driver_stock))
        .route_layer(from_fn_with_state(UserRole::Resident, require_route_role));

    let protected_v1 = Router::new()
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        .nest("/admin", admin_routes)
        .nest("/driver", driver_routes)
        .nest("/resident", resident_routes)
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let v1_routes = public_v1.merge(protected_v1);

    let public_web = Router::new()
        .route("/", get(web::index))
        .route("/web/login", get(web::login::login_page).post(web::login::login_submit))
        .route("/web/logout", get(web::login::logout));

    let session_web = Router::new()
        .route("/dashboard", get(web::dashboard))
        .route("/admin/dashboard", get(web::admin::dashboard))
        .route("/admin/create-driver", post(web::admin::create_driver))
        .route("/admin/create-resident", post(web::admin::create_resident))
        .route("/admin/add-area", post(web::admin::add_area))
        .route("/admin/add-street", post(web::admin::add_street))
        .route("/admin/add-item", post(web::admin::add_item))
        .route(
            "/driver/dashboard",
            get(web::driver::dashboard).post(web::driver::action),
        )
        .route(
            "/resident/dashboard",
            get(web::resident::dashboard).post(web::resident::action),
        )
        .route_layer(from_fn_with_state(state.clone(), require_web_session));

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .merge(public_web)
        .merge(session_web)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
