//! Middleware modules for the API server
//!
//! - `security`: response security headers
//! - `session`: bearer/cookie authentication and role guards

pub mod security;
pub mod session;
