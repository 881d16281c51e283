//! Authentication and authorization primitives
//!
//! - [`password`]: Argon2id hashing and verification
//! - [`jwt`]: HS256 access/refresh tokens carrying user ID and role
//! - [`middleware`]: token extraction (bearer header or session cookie) for Axum
//! - [`authorization`]: per-route role checks

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
