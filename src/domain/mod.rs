//! Domain layer: entities, status rules and repository interfaces.
//!
//! Nothing in here knows about HTTP or SeaORM.

pub mod booking;
pub mod repositories;
pub mod restaurant;
pub mod review;
pub mod user;

pub use booking::{
    Booking, BookingChanges, BookingRepository, BookingStatus, BookingWithRestaurant, NewBooking,
    SlotOccupancy,
};
pub use repositories::{DomainResult, RepositoryProvider};
pub use restaurant::{
    NewRestaurant, Restaurant, RestaurantChanges, RestaurantFilter, RestaurantRepository,
    RestaurantStatus,
};
pub use review::{NewReview, Review, ReviewRepository};
pub use user::{Actor, NewUser, User, UserRepository, UserRole};

pub use crate::shared::errors::DomainError;
