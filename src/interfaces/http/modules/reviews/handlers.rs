//! Review handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateReviewRequest, ReviewCreatedResponse, ReviewDeletedResponse};
use crate::application::ReviewService;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson,
};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct ReviewState {
    pub reviews: Arc<ReviewService>,
}

#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review posted, rating recomputed", body = ApiResponse<ReviewCreatedResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Restaurant not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_review(
    State(state): State<ReviewState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewCreatedResponse>>), ApiError> {
    let (review, restaurant_rating) = state
        .reviews
        .create(&caller.actor(), req.restaurant_id, &req.content, req.rating)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReviewCreatedResponse {
            review: review.into(),
            restaurant_rating,
        })),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted, rating recomputed", body = ApiResponse<ReviewDeletedResponse>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<ReviewState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
) -> ApiResult<ReviewDeletedResponse> {
    let restaurant_rating = state
        .reviews
        .delete(&caller.actor(), id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ReviewDeletedResponse {
        restaurant_rating,
    })))
}
