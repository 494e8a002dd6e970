//! Table bookings

pub mod service;

pub use service::{BookingInput, BookingService};
