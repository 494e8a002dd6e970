//! Restaurant handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateRestaurantRequest, RestaurantDetailDto, RestaurantDto, RestaurantSearchQuery,
    UpdateRestaurantRequest,
};
use crate::application::{BookingService, RestaurantService, ReviewService};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, EmptyData, PaginatedResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::{AuthenticatedUser, MaybeUser};
use crate::interfaces::http::modules::bookings::BookingDto;
use crate::interfaces::http::modules::reviews::ReviewDto;

/// Restaurant routes also expose their reviews and bookings
#[derive(Clone)]
pub struct RestaurantState {
    pub restaurants: Arc<RestaurantService>,
    pub reviews: Arc<ReviewService>,
    pub bookings: Arc<BookingService>,
}

#[utoipa::path(
    get,
    path = "/api/restaurants",
    tag = "Restaurants",
    params(RestaurantSearchQuery),
    responses(
        (status = 200, description = "Approved restaurants matching the filter", body = ApiResponse<PaginatedResponse<RestaurantDto>>)
    )
)]
pub async fn search_restaurants(
    State(state): State<RestaurantState>,
    Query(query): Query<RestaurantSearchQuery>,
) -> ApiResult<PaginatedResponse<RestaurantDto>> {
    let result = state
        .restaurants
        .search(query.filter(), query.pagination())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(
        result,
        RestaurantDto::from,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant with owner and reviews", body = ApiResponse<RestaurantDetailDto>),
        (status = 404, description = "Not found or not visible to the caller")
    )
)]
pub async fn get_restaurant(
    State(state): State<RestaurantState>,
    viewer: MaybeUser,
    Path(id): Path<i32>,
) -> ApiResult<RestaurantDetailDto> {
    let details = state
        .restaurants
        .details(viewer.actor().as_ref(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}/reviews",
    tag = "Restaurants",
    params(("id" = i32, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Reviews, newest first", body = ApiResponse<Vec<ReviewDto>>),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn list_restaurant_reviews(
    State(state): State<RestaurantState>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<ReviewDto>> {
    let reviews = state
        .reviews
        .list_for_restaurant(id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/restaurants",
    tag = "Restaurants",
    security(("bearer_auth" = [])),
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Submitted for approval", body = ApiResponse<RestaurantDto>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not a business owner or admin"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_restaurant(
    State(state): State<RestaurantState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateRestaurantRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RestaurantDto>>), ApiError> {
    let restaurant = state
        .restaurants
        .create(&caller.actor(), req.into_new(caller.user_id))
        .await
        .map_err(domain_error)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(restaurant.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/restaurants/{id}",
    tag = "Restaurants",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Restaurant ID")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated", body = ApiResponse<RestaurantDto>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn update_restaurant(
    State(state): State<RestaurantState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateRestaurantRequest>,
) -> ApiResult<RestaurantDto> {
    let restaurant = state
        .restaurants
        .update(&caller.actor(), id, req.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(restaurant.into())))
}

#[utoipa::path(
    delete,
    path = "/api/restaurants/{id}",
    tag = "Restaurants",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant deleted with its reviews and bookings", body = ApiResponse<EmptyData>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn delete_restaurant(
    State(state): State<RestaurantState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<EmptyData> {
    state
        .restaurants
        .delete(&caller.actor(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/mine",
    tag = "Restaurants",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's restaurants in every status", body = ApiResponse<Vec<RestaurantDto>>),
        (status = 403, description = "Caller is not a business owner or admin")
    )
)]
pub async fn my_restaurants(
    State(state): State<RestaurantState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<RestaurantDto>> {
    let restaurants = state
        .restaurants
        .mine(&caller.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        restaurants.into_iter().map(RestaurantDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/restaurants/{id}/bookings",
    tag = "Restaurants",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Every booking of the restaurant", body = ApiResponse<Vec<BookingDto>>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn list_restaurant_bookings(
    State(state): State<RestaurantState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<BookingDto>> {
    let bookings = state
        .bookings
        .for_restaurant(&caller.actor(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}
