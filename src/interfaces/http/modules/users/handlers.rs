//! User profile handlers

use axum::{extract::State, Extension, Json};

use super::dto::UpdateProfileRequest;
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::auth::{AuthHandlerState, UserDto};

#[utoipa::path(
    put,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Email already in use"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<UserDto> {
    let user = state
        .identity
        .update_profile(&caller.actor(), &req.name, &req.email)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}
