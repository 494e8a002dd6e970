//! SeaORM entities

pub mod booking;
pub mod restaurant;
pub mod review;
pub mod user;

pub use booking::Entity as Booking;
pub use restaurant::Entity as Restaurant;
pub use review::Entity as Review;
pub use user::Entity as User;
