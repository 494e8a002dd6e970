//! Response envelope and pagination DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::{PaginatedResult, PaginationParams};

/// Envelope for every JSON response.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty payload for operations that return nothing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// `?page=&limit=` query parameters
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationQuery {
    /// 1-based page number. Default 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page, 1 to 100. Default 50
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl From<&PaginationQuery> for PaginationParams {
    fn from(q: &PaginationQuery) -> Self {
        PaginationParams::normalized(q.page, q.limit)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Across all pages
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn from_result<U>(result: PaginatedResult<U>, f: impl FnMut(U) -> T) -> Self {
        let result = result.map(f);
        Self {
            items: result.items,
            total: result.total,
            page: result.page,
            limit: result.limit,
            total_pages: result.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_has_null_data() {
        let body = serde_json::to_value(ApiResponse::<()>::error("nope")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": false, "data": null, "error": "nope"})
        );
    }

    #[test]
    fn success_envelope_omits_error() {
        let body = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": 5}));
    }

    #[test]
    fn query_is_clamped() {
        let params = PaginationParams::from(&PaginationQuery { page: 0, limit: 1000 });
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 100);
    }

    #[test]
    fn paginated_response_maps_items() {
        let result = PaginatedResult::new(vec![1, 2], 5, 1, 2);
        let resp = PaginatedResponse::from_result(result, |n| n * 10);
        assert_eq!(resp.items, vec![10, 20]);
        assert_eq!(resp.total_pages, 3);
    }
}
