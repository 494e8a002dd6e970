//! Authentication: registration, login portals, session status

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
