//! Configuration management for the API server
//!
//! Configuration is read from environment variables; a `.env` file in the
//! working directory is loaded first when present.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
//! - `API_HOST`: host to bind to (default: 0.0.0.0)
//! - `API_PORT`: port to bind to (default: 8080)
//! - `JWT_SECRET`: HS256 signing key, at least 32 characters (required)
//! - `CORS_ORIGINS`: comma-separated origins, `*` for any (default: `*`)
//! - `PRODUCTION`: enables HSTS and `Secure` cookies (default: false)
//! - `BREADVAN_AUTO_MIGRATE`: run migrations at startup (default: 1)
//! - `BREADVAN_AUTO_INIT`: wipe and load demo data at startup (default: 0)
//!
//! # Example
//!
//! ```no_run
//! use breadvan_api::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Server will listen on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::env;

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub startup: StartupConfig,
}

/// HTTP listener and browser-facing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive
    pub cors_origins: Vec<String>,

    /// Production mode: HSTS header and `Secure` session cookie
    pub production: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// What the server does to the database before it starts listening
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupConfig {
    pub auto_migrate: bool,

    /// Drops all data and loads the demo dataset
    pub auto_init: bool,
}

fn parse_flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim) {
        Some("1") | Some("true") | Some("TRUE") | Some("yes") => true,
        Some("0") | Some("false") | Some("FALSE") | Some("no") => false,
        _ => default,
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does
    /// not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()?;

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if secret.len() < MIN_JWT_SECRET_LENGTH {
            anyhow::bail!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production: parse_flag(lookup("PRODUCTION"), false),
            },
            database: DatabaseConfig {
                url,
                max_connections,
            },
            jwt: JwtConfig { secret },
            startup: StartupConfig {
                auto_migrate: parse_flag(lookup("BREADVAN_AUTO_MIGRATE"), true),
                auto_init: parse_flag(lookup("BREADVAN_AUTO_INIT"), false),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgresql://localhost/breadvan"),
        ("JWT_SECRET", "test-secret-key-at-least-32-bytes-long"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(REQUIRED)).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(!config.api.production);
        assert!(config.startup.auto_migrate);
        assert!(!config.startup.auto_init);
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("PRODUCTION", "true"),
            ("BREADVAN_AUTO_INIT", "1"),
            ("BREADVAN_AUTO_MIGRATE", "0"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.api.cors_origins.len(), 2);
        assert!(config.api.production);
        assert!(config.startup.auto_init);
        assert!(!config.startup.auto_migrate);
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[("JWT_SECRET", "x".repeat(40).as_str())]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_short_jwt_secret() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgresql://localhost/breadvan"),
            ("JWT_SECRET", "short"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_bad_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("API_PORT", "eighty"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }
}
