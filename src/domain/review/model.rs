//! Review domain entity and rating aggregation

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone)]
pub struct Review {
    pub id: i32,
    pub content: String,
    /// 1..=5
    pub rating: i32,
    pub user_id: i32,
    pub restaurant_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub content: String,
    pub rating: i32,
    pub user_id: i32,
    pub restaurant_id: i32,
}

pub fn validate_rating(rating: i32) -> DomainResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )))
    }
}

/// Arithmetic mean of `ratings`; `0.0` for an empty slice.
pub fn mean_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    sum as f64 / ratings.len() as f64
}
