//! Booking DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{Booking, BookingWithRestaurant, SlotOccupancy};

/// Both parameters are required; they are optional here so a missing one
/// is reported in the response envelope
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub restaurant_id: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    /// `HH:MM`
    pub time: String,
    pub number_of_people: i32,
    pub status: String,
}

impl From<SlotOccupancy> for SlotDto {
    fn from(s: SlotOccupancy) -> Self {
        Self {
            time: s.time,
            number_of_people: s.number_of_people,
            status: s.status.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub restaurant_id: i32,
    pub date: NaiveDate,
    /// `HH:MM`, 24h
    #[validate(length(min = 1, message = "is required"))]
    pub time: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub number_of_people: i32,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub customer_name: String,
    #[validate(email(message = "invalid email format"))]
    pub customer_email: String,
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub customer_phone: Option<String>,
}

/// Absent fields stay as they are
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    /// `confirmed` or `cancelled`
    pub status: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub number_of_people: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: i32,
    pub user_id: Option<i32>,
    pub restaurant_id: i32,
    pub date: NaiveDate,
    pub time: String,
    pub number_of_people: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            restaurant_id: b.restaurant_id,
            date: b.date,
            time: b.time,
            number_of_people: b.number_of_people,
            customer_name: b.customer_name,
            customer_email: b.customer_email,
            customer_phone: b.customer_phone,
            status: b.status.to_string(),
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// A booking as listed on the diner's own page
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyBookingDto {
    #[serde(flatten)]
    pub booking: BookingDto,
    pub restaurant_name: String,
    pub restaurant_address: String,
}

impl From<BookingWithRestaurant> for MyBookingDto {
    fn from(b: BookingWithRestaurant) -> Self {
        Self {
            booking: b.booking.into(),
            restaurant_name: b.restaurant_name,
            restaurant_address: b.restaurant_address,
        }
    }
}
