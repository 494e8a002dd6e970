//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use super::model::{Booking, BookingStatus, BookingWithRestaurant, NewBooking};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert a confirmed booking unless another confirmed booking holds the
    /// same (restaurant, date, time). The insert and the check share one
    /// transaction, and a unique index backs it up; either path yields
    /// `DomainError::SlotTaken`. Concurrent callers for one slot get exactly
    /// one success.
    async fn create_if_slot_free(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Persist an edited booking. When `check_slot` is set the same conflict
    /// rule as [`create_if_slot_free`](Self::create_if_slot_free) applies,
    /// ignoring the booking itself.
    async fn save(&self, booking: Booking, check_slot: bool) -> DomainResult<Booking>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// All bookings (any status) of a restaurant on a date, ordered by time
    async fn list_for_date(&self, restaurant_id: i32, date: NaiveDate)
        -> DomainResult<Vec<Booking>>;

    /// Ordered by date then time
    async fn list_for_user(&self, user_id: i32) -> DomainResult<Vec<BookingWithRestaurant>>;

    /// Ordered by date then time
    async fn list_for_restaurant(&self, restaurant_id: i32) -> DomainResult<Vec<Booking>>;

    /// Count bookings, optionally only those in `status`
    async fn count(&self, status: Option<BookingStatus>) -> DomainResult<u64>;

    async fn created_timestamps_since(&self, since: DateTime<Utc>)
        -> DomainResult<Vec<DateTime<Utc>>>;
}
