//! Review repository interface

use async_trait::async_trait;

use super::model::{NewReview, Review};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review and overwrite the restaurant's `ratings` with the mean
    /// over all of its reviews, atomically. Returns the review and the new mean.
    async fn create_and_refresh_rating(&self, review: NewReview) -> DomainResult<(Review, f64)>;

    /// Delete a review and recompute the restaurant mean. Returns the new mean.
    async fn delete_and_refresh_rating(&self, id: i32) -> DomainResult<f64>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Review>>;

    /// Newest first
    async fn list_for_restaurant(&self, restaurant_id: i32) -> DomainResult<Vec<Review>>;
}
