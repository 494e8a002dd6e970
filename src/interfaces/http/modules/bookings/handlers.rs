//! Booking handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;

use super::dto::{
    AvailabilityQuery, BookingDto, CreateBookingRequest, MyBookingDto, SlotDto,
    UpdateBookingRequest,
};
use crate::application::{BookingInput, BookingService};
use crate::domain::{BookingChanges, BookingStatus};
use crate::interfaces::http::common::{
    bad_request, domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct BookingState {
    pub bookings: Arc<BookingService>,
}

fn parse_availability(query: &AvailabilityQuery) -> Result<(i32, NaiveDate), ApiError> {
    let (Some(restaurant_id), Some(date)) = (query.restaurant_id.as_deref(), query.date.as_deref())
    else {
        return Err(bad_request("restaurantId and date are required"));
    };
    let restaurant_id = restaurant_id
        .trim()
        .parse()
        .map_err(|_| bad_request("restaurantId must be an integer"))?;
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| bad_request("date must be YYYY-MM-DD"))?;
    Ok((restaurant_id, date))
}

fn parse_status(raw: Option<&str>) -> Result<Option<BookingStatus>, ApiError> {
    raw.map(|s| {
        BookingStatus::from_str(s.trim())
            .ok_or_else(|| bad_request("status must be 'confirmed' or 'cancelled'"))
    })
    .transpose()
}

#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "Bookings",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookings on that date", body = ApiResponse<Vec<SlotDto>>),
        (status = 400, description = "restaurantId or date missing")
    )
)]
pub async fn availability(
    State(state): State<BookingState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Vec<SlotDto>> {
    let (restaurant_id, date) = parse_availability(&query)?;
    let slots = state
        .bookings
        .availability(restaurant_id, date)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        slots.into_iter().map(SlotDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking confirmed", body = ApiResponse<BookingDto>),
        (status = 400, description = "Slot already booked or restaurant not open for bookings"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn create_booking(
    State(state): State<BookingState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingDto>>), ApiError> {
    let input = BookingInput {
        restaurant_id: req.restaurant_id,
        date: req.date,
        time: req.time,
        number_of_people: req.number_of_people,
        customer_name: req.customer_name,
        customer_email: req.customer_email,
        customer_phone: req.customer_phone,
    };
    let booking = state
        .bookings
        .create(&caller.actor(), input)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking.into()))))
}

#[utoipa::path(
    patch,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid change or slot already booked"),
        (status = 403, description = "Not your booking"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking(
    State(state): State<BookingState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateBookingRequest>,
) -> ApiResult<BookingDto> {
    let changes = BookingChanges {
        status: parse_status(req.status.as_deref())?,
        date: req.date,
        time: req.time,
        number_of_people: req.number_of_people,
    };
    let booking = state
        .bookings
        .update(&caller.actor(), id, changes)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 403, description = "Not your booking"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<BookingDto> {
    let booking = state
        .bookings
        .cancel(&caller.actor(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/bookings/my",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's bookings by date and time", body = ApiResponse<Vec<MyBookingDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_bookings(
    State(state): State<BookingState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<MyBookingDto>> {
    let bookings = state
        .bookings
        .mine(&caller.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(MyBookingDto::from).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(restaurant_id: Option<&str>, date: Option<&str>) -> AvailabilityQuery {
        AvailabilityQuery {
            restaurant_id: restaurant_id.map(String::from),
            date: date.map(String::from),
        }
    }

    #[test]
    fn availability_needs_both_params() {
        assert!(parse_availability(&query(Some("1"), None)).is_err());
        assert!(parse_availability(&query(None, Some("2025-06-01"))).is_err());
        assert!(parse_availability(&query(Some("x"), Some("2025-06-01"))).is_err());
        assert!(parse_availability(&query(Some("1"), Some("06/01/2025"))).is_err());

        let (id, date) = parse_availability(&query(Some("7"), Some("2025-06-01"))).unwrap();
        assert_eq!(id, 7);
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn status_must_be_known() {
        assert_eq!(parse_status(None).unwrap(), None);
        assert_eq!(
            parse_status(Some("cancelled")).unwrap(),
            Some(BookingStatus::Cancelled)
        );
        let (status, _) = parse_status(Some("pending")).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
