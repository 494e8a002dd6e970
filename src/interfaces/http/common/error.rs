//! Mapping of domain errors onto HTTP responses

use axum::http::StatusCode;
use axum::Json;
use tracing::{error, warn};

use super::ApiResponse;
use crate::domain::DomainError;

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_)
        | DomainError::SlotTaken { .. }
        | DomainError::InvalidState(_)
        | DomainError::Conflict(_) => StatusCode::BAD_REQUEST,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Database(_) | DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert a [`DomainError`] into a response. Server-side failures are
/// logged in full and reported with a generic message.
pub fn domain_error(err: DomainError) -> ApiError {
    let status = status_for(&err);
    let message = if err.is_server_error() {
        error!(error = %err, "Request failed");
        "Internal server error".to_string()
    } else {
        warn!(status = status.as_u16(), error = %err, "Request rejected");
        err.to_string()
    };
    (status, Json(ApiResponse::error(message)))
}

/// Shorthand for a client error that never went through the domain layer
pub fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::InvalidState("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (DomainError::not_found("Booking", 3), StatusCode::NOT_FOUND),
            (DomainError::Database("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "{:?}", err);
        }
    }

    #[test]
    fn slot_taken_keeps_its_message() {
        let (status, Json(body)) = domain_error(DomainError::SlotTaken {
            restaurant_id: 1,
            date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            time: "19:00".into(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.as_deref(), Some("This time slot is already booked"));
    }

    #[test]
    fn server_errors_are_not_leaked() {
        let (status, Json(body)) =
            domain_error(DomainError::Database("disk I/O error at /var/db".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }
}
