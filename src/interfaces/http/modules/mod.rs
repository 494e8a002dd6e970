pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod restaurants;
pub mod reviews;
pub mod users;
