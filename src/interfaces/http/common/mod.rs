//! Shared HTTP building blocks

pub mod error;
pub mod response;
pub mod validated_json;

pub use error::{bad_request, domain_error, ApiError, ApiResult};
pub use response::{ApiResponse, EmptyData, PaginatedResponse, PaginationQuery};
pub use validated_json::ValidatedJson;
