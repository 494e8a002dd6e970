//! HTTP REST API
//!
//! - `common`: response envelope, validated JSON extractor, error mapping
//! - `middleware`: bearer-token authentication
//! - `modules`: per-resource DTOs and handlers
//! - `router`: route table, OpenAPI document, Swagger UI

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc, AppServices};
