//! Nalanda Library Management System
//!
//! A Rust backend for library management, exposing a REST JSON API and a
//! GraphQL endpoint over the same catalog, membership, and lending services.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod graphql;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub schema: graphql::AppSchema,
}
