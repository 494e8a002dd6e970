use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Review;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub restaurant_id: i32,
    #[validate(length(min = 1, max = 5000, message = "must be 1-5000 characters"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: i32,
    pub content: String,
    pub rating: i32,
    pub user_id: i32,
    pub restaurant_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            content: r.content,
            rating: r.rating,
            user_id: r.user_id,
            restaurant_id: r.restaurant_id,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewCreatedResponse {
    pub review: ReviewDto,
    /// Mean rating of the restaurant after this review
    pub restaurant_rating: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDeletedResponse {
    pub restaurant_rating: f64,
}
