//! Reviews and their effect on the restaurant rating

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
