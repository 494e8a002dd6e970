//! Admin handlers. Every route requires an admin token; the role check
//! happens in the services.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::dto::{
    AnalyticsDto, DailyTrendDto, DecisionResponse, PendingRestaurantDto, StatusDecisionRequest,
    TrendQuery,
};
use crate::application::analytics::DEFAULT_TREND_DAYS;
use crate::application::{AdminDecision, AnalyticsService, RestaurantService};
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

#[derive(Clone)]
pub struct AdminState {
    pub restaurants: Arc<RestaurantService>,
    pub analytics: Arc<AnalyticsService>,
}

#[utoipa::path(
    get,
    path = "/api/admin/restaurants/pending",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Approval queue, oldest first", body = ApiResponse<Vec<PendingRestaurantDto>>),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn pending_restaurants(
    State(state): State<AdminState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<Vec<PendingRestaurantDto>> {
    let queue = state
        .restaurants
        .pending(&caller.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        queue.into_iter().map(PendingRestaurantDto::from).collect(),
    )))
}

#[utoipa::path(
    put,
    path = "/api/admin/restaurants/{id}/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Restaurant ID")),
    request_body = StatusDecisionRequest,
    responses(
        (status = 200, description = "Approved, or rejected and deleted", body = ApiResponse<DecisionResponse>),
        (status = 400, description = "Unknown status or restaurant is not pending"),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "Restaurant not found")
    )
)]
pub async fn decide_restaurant(
    State(state): State<AdminState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<StatusDecisionRequest>,
) -> ApiResult<DecisionResponse> {
    let decision = AdminDecision::parse(&req.status).map_err(domain_error)?;
    let outcome = state
        .restaurants
        .decide(&caller.actor(), id, decision)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Platform summary", body = ApiResponse<AnalyticsDto>),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn analytics_summary(
    State(state): State<AdminState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<AnalyticsDto> {
    let summary = state
        .analytics
        .summary(&caller.actor())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(summary.into())))
}

#[utoipa::path(
    get,
    path = "/api/admin/trends",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(TrendQuery),
    responses(
        (status = 200, description = "One entry per UTC day, oldest first", body = ApiResponse<Vec<DailyTrendDto>>),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn analytics_trends(
    State(state): State<AdminState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(query): Query<TrendQuery>,
) -> ApiResult<Vec<DailyTrendDto>> {
    let trends = state
        .analytics
        .trends(&caller.actor(), query.days.unwrap_or(DEFAULT_TREND_DAYS))
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        trends.into_iter().map(DailyTrendDto::from).collect(),
    )))
}
