//! Booking aggregate: table reservations keyed by (restaurant, date, time)

pub mod model;
pub mod repository;

pub use model::{
    normalize_time, validate_party_size, Booking, BookingChanges, BookingStatus,
    BookingWithRestaurant, NewBooking, SlotOccupancy,
};
pub use repository::BookingRepository;
