//! # CareerConnect Backend
//!
//! Placement-management backend for campus recruitment: students, TPO
//! admins, management admins and a superuser share one account store,
//! with role-scoped access enforced at the HTTP layer.
//!
//! ## Architecture
//!
//! - **config**: TOML + environment configuration
//! - **auth**: JWT verification, password hashing and the request gate
//! - **bootstrap**: startup provisioning of the privileged operator accounts
//! - **infrastructure**: database connection, entities and migrations
//! - **api**: REST API with Swagger documentation

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
