//! Restaurant listings and the admin approval workflow

pub mod service;

pub use service::{
    AdminDecision, DecisionOutcome, PendingRestaurant, RestaurantDetails, RestaurantService,
};
