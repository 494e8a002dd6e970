//! Authentication API handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};

use super::dto::{
    AuthResponse, ChangePasswordRequest, LoginRequest, RegisterRequest, SessionStatus, UserDto,
};
use crate::application::{IdentityService, LoginPortal};
use crate::domain::UserRole;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, EmptyData, ValidatedJson,
};
use crate::interfaces::http::middleware::{authenticate_headers_or_cookie, AuthenticatedUser};

#[derive(Clone)]
pub struct AuthHandlerState {
    pub identity: Arc<IdentityService>,
}

type Created<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

async fn register_as(state: &AuthHandlerState, req: RegisterRequest, role: UserRole) -> Created<AuthResponse> {
    let result = state
        .identity
        .register(&req.name, &req.email, &req.password, role)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result.into()))))
}

async fn login_via(state: &AuthHandlerState, req: LoginRequest, portal: LoginPortal) -> ApiResult<AuthResponse> {
    let result = state
        .identity
        .login(&req.email, &req.password, portal)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Diner account created", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Created<AuthResponse> {
    register_as(&state, req, UserRole::User).await
}

#[utoipa::path(
    post,
    path = "/api/auth/register-business",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Business owner account created", body = ApiResponse<AuthResponse>),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register_business(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Created<AuthResponse> {
    register_as(&state, req, UserRole::BusinessOwner).await
}

#[utoipa::path(
    post,
    path = "/api/auth/register-admin",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Admin account created", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not an admin")
    )
)]
pub async fn register_admin(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Created<AuthResponse> {
    let result = state
        .identity
        .register_admin(&caller.actor(), &req.name, &req.email, &req.password)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(result.into()))))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    login_via(&state, req, LoginPortal::Any).await
}

#[utoipa::path(
    post,
    path = "/api/auth/login-business",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is not a business owner")
    )
)]
pub async fn login_business(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    login_via(&state, req, LoginPortal::Business).await
}

#[utoipa::path(
    post,
    path = "/api/auth/login-admin",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account is not an admin")
    )
)]
pub async fn login_admin(
    State(state): State<AuthHandlerState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    login_via(&state, req, LoginPortal::Admin).await
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = ApiResponse<UserDto>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> ApiResult<UserDto> {
    let user = state.identity.me(&caller.actor()).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    put,
    path = "/api/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ApiResponse<EmptyData>),
        (status = 401, description = "Current password is wrong")
    )
)]
pub async fn change_password(
    State(state): State<AuthHandlerState>,
    Extension(caller): Extension<AuthenticatedUser>,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<EmptyData> {
    state
        .identity
        .change_password(&caller.actor(), &req.current_password, &req.new_password)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Accepts the bearer header or the `token` cookie
#[utoipa::path(
    get,
    path = "/api/status",
    tag = "Authentication",
    responses(
        (status = 200, description = "Session is valid", body = ApiResponse<SessionStatus>),
        (status = 401, description = "No valid session", body = ApiResponse<SessionStatus>)
    )
)]
pub async fn session_status(
    State(state): State<AuthHandlerState>,
    headers: HeaderMap,
) -> (StatusCode, Json<ApiResponse<SessionStatus>>) {
    match authenticate_headers_or_cookie(&headers, state.identity.jwt_config()) {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(SessionStatus {
                authenticated: true,
                user_id: Some(user.user_id),
                role: Some(user.role.to_string()),
            })),
        ),
        Err(e) => (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse {
                success: false,
                data: Some(SessionStatus {
                    authenticated: false,
                    user_id: None,
                    role: None,
                }),
                error: Some(e.to_string()),
            }),
        ),
    }
}
