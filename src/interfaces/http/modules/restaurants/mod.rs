//! Restaurant listings: search, detail, owner CRUD

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
