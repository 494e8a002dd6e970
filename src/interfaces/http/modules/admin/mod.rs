//! Admin: approval queue and platform analytics

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
