//! Identity: registration, login, profile

pub mod service;

pub use service::{AuthResult, IdentityService, LoginPortal};
