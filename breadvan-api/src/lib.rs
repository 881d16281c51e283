//! # Bread Van API Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers, authentication and role guards
//! - `routes`: JSON API handlers under `/v1`
//! - `web`: Server-rendered dashboards

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod web;
