//! Restaurant aggregate and its approval workflow

pub mod model;
pub mod repository;

pub use model::{NewRestaurant, Restaurant, RestaurantChanges, RestaurantFilter, RestaurantStatus};
pub use repository::RestaurantRepository;
