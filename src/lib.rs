//! # Dinebook
//!
//! Restaurant discovery and table booking service.
//!
//! ## Architecture
//!
//! - **domain**: entities, status rules, repository traits, `DomainError`
//! - **application**: use cases (identity, restaurants, reviews, bookings, analytics)
//! - **infrastructure**: SeaORM persistence, JWT and bcrypt
//! - **interfaces**: REST API with Swagger documentation
//! - **server**: runtime bootstrap and graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_api_router, ApiDoc, AppServices};
