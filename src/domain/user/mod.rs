//! User aggregate

pub mod model;
pub mod repository;

pub use model::{Actor, NewUser, User, UserRole};
pub use repository::UserRepository;
