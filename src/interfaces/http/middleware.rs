//! Bearer-token authentication for Axum
//!
//! [`auth_middleware`] rejects requests without a valid token,
//! [`optional_auth_middleware`] only attaches the caller when one is present.
//! Both store an [`AuthenticatedUser`] in the request extensions.

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::common::ApiResponse;
use crate::domain::{Actor, UserRole};
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};

/// Cookie checked by the session status endpoint when no header is sent
pub const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing authentication token")]
    MissingToken,
    #[error("Invalid authentication token")]
    InvalidToken,
}

#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
}

/// The caller, as established by a verified token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let role = claims.user_role().ok_or(AuthError::InvalidToken)?;
        Ok(Self {
            user_id: claims.id,
            email: claims.email,
            role,
        })
    }

    pub fn actor(&self) -> Actor {
        Actor::new(self.user_id, self.role)
    }
}

/// Caller attached by [`optional_auth_middleware`], if any
#[derive(Clone, Debug, Default)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl MaybeUser {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(AuthenticatedUser::actor)
    }
}

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<AuthenticatedUser>().cloned()))
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    value
        .strip_prefix("Bearer ")
        .map(|t| Some(t.trim()))
        .ok_or(AuthError::InvalidToken)
}

fn cookie_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|v| !v.is_empty())
}

/// Verify `token` and turn its claims into the caller
pub fn authenticate(token: &str, config: &JwtConfig) -> Result<AuthenticatedUser, AuthError> {
    let claims = verify_token(token, config).map_err(|_| AuthError::InvalidToken)?;
    AuthenticatedUser::from_claims(claims)
}

/// Resolve the caller from the `Authorization` header only
pub fn authenticate_headers(
    headers: &HeaderMap,
    config: &JwtConfig,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?.ok_or(AuthError::MissingToken)?;
    authenticate(token, config)
}

/// Resolve the caller from the `Authorization` header, falling back to the
/// `token` cookie
pub fn authenticate_headers_or_cookie(
    headers: &HeaderMap,
    config: &JwtConfig,
) -> Result<AuthenticatedUser, AuthError> {
    let token = match bearer_token(headers)? {
        Some(token) => token,
        None => cookie_token(headers).ok_or(AuthError::MissingToken)?,
    };
    authenticate(token, config)
}

pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate_headers(request.headers(), &auth.jwt_config) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Attach the caller when a valid token is sent; never rejects
pub async fn optional_auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Ok(user) = authenticate_headers(request.headers(), &auth.jwt_config) {
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

pub fn auth_error_response(error: AuthError) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(error.to_string())),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::jwt::create_token;
    use axum::http::HeaderValue;

    fn config() -> JwtConfig {
        JwtConfig::new("middleware-secret", 1)
    }

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn bearer_header_authenticates() {
        let cfg = config();
        let token = create_token(5, "bo@example.com", UserRole::BusinessOwner, &cfg).unwrap();
        let user = authenticate_headers(
            &headers(&[(header::AUTHORIZATION, &format!("Bearer {}", token))]),
            &cfg,
        )
        .unwrap();
        assert_eq!(user.user_id, 5);
        assert_eq!(user.actor(), Actor::new(5, UserRole::BusinessOwner));
    }

    #[test]
    fn missing_and_malformed_headers() {
        let cfg = config();
        assert_eq!(
            authenticate_headers(&HeaderMap::new(), &cfg).unwrap_err(),
            AuthError::MissingToken
        );
        assert_eq!(
            authenticate_headers(&headers(&[(header::AUTHORIZATION, "Basic abc")]), &cfg)
                .unwrap_err(),
            AuthError::InvalidToken
        );
        assert_eq!(
            authenticate_headers(&headers(&[(header::AUTHORIZATION, "Bearer nope")]), &cfg)
                .unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[test]
    fn cookie_is_only_a_fallback() {
        let cfg = config();
        let token = create_token(9, "u@example.com", UserRole::User, &cfg).unwrap();
        let cookie = format!("theme=dark; token={}; other=1", token);

        let user =
            authenticate_headers_or_cookie(&headers(&[(header::COOKIE, &cookie)]), &cfg).unwrap();
        assert_eq!(user.user_id, 9);

        assert!(authenticate_headers(&headers(&[(header::COOKIE, &cookie)]), &cfg).is_err());
        assert_eq!(
            authenticate_headers_or_cookie(&headers(&[(header::COOKIE, "token=")]), &cfg)
                .unwrap_err(),
            AuthError::MissingToken
        );
    }
}
