//! Review service
//!
//! Every write recomputes the restaurant's mean rating in the same
//! transaction as the write itself.

use std::sync::Arc;

use tracing::info;

use crate::domain::review::validate_rating;
use crate::domain::{Actor, DomainError, DomainResult, NewReview, RepositoryProvider, Review};

pub struct ReviewService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReviewService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Post a review as `actor`. Returns the review and the restaurant's new
    /// mean rating.
    pub async fn create(
        &self,
        actor: &Actor,
        restaurant_id: i32,
        content: &str,
        rating: i32,
    ) -> DomainResult<(Review, f64)> {
        validate_rating(rating)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation("Review content is required".into()));
        }

        let restaurant = self
            .repos
            .restaurants()
            .find_by_id(restaurant_id)
            .await?
            .filter(|r| r.is_public())
            .ok_or_else(|| DomainError::not_found("Restaurant", restaurant_id))?;

        let (review, mean) = self
            .repos
            .reviews()
            .create_and_refresh_rating(NewReview {
                content: content.to_string(),
                rating,
                user_id: actor.user_id,
                restaurant_id: restaurant.id,
            })
            .await?;

        metrics::counter!("reviews_created_total").increment(1);
        info!(
            review_id = review.id,
            restaurant_id,
            rating,
            mean,
            "Review posted"
        );
        Ok((review, mean))
    }

    /// Remove a review. Only its author or an admin may do this.
    pub async fn delete(&self, actor: &Actor, id: i32) -> DomainResult<f64> {
        let review = self
            .repos
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", id))?;

        if !actor.owns_or_admin(Some(review.user_id)) {
            return Err(DomainError::Forbidden(
                "You can only delete your own reviews".into(),
            ));
        }

        let mean = self.repos.reviews().delete_and_refresh_rating(id).await?;
        info!(review_id = id, restaurant_id = review.restaurant_id, mean, "Review deleted");
        Ok(mean)
    }

    pub async fn list_for_restaurant(&self, restaurant_id: i32) -> DomainResult<Vec<Review>> {
        if self
            .repos
            .restaurants()
            .find_by_id(restaurant_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("Restaurant", restaurant_id));
        }
        self.repos.reviews().list_for_restaurant(restaurant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::repos;
    use crate::domain::{NewRestaurant, NewUser, RestaurantStatus, UserRole};

    async fn setup() -> (ReviewService, Arc<dyn RepositoryProvider>, Actor, Actor, i32) {
        let repos = repos().await;
        let mut actors = Vec::new();
        for (email, role) in [
            ("owner@example.com", UserRole::BusinessOwner),
            ("diner@example.com", UserRole::User),
            ("other@example.com", UserRole::User),
        ] {
            let u = repos
                .users()
                .create(NewUser {
                    name: email.into(),
                    email: email.into(),
                    password_hash: "x".into(),
                    role,
                })
                .await
                .unwrap();
            actors.push(Actor::new(u.id, u.role));
        }
        let r = repos
            .restaurants()
            .create(NewRestaurant {
                name: "Diner".into(),
                description: None,
                address: "3 High St".into(),
                zipcode: "02139".into(),
                cuisine: "American".into(),
                price_range: "$$".into(),
                image_url: None,
                owner_id: actors[0].user_id,
            })
            .await
            .unwrap();
        repos
            .restaurants()
            .set_status(r.id, RestaurantStatus::Approved)
            .await
            .unwrap();

        (
            ReviewService::new(repos.clone()),
            repos,
            actors[1],
            actors[2],
            r.id,
        )
    }

    #[tokio::test]
    async fn mean_follows_inserts_and_deletes() {
        let (svc, repos, diner, other, restaurant) = setup().await;

        svc.create(&diner, restaurant, "Great", 5).await.unwrap();
        svc.create(&other, restaurant, "Fine", 3).await.unwrap();
        let (last, mean) = svc.create(&other, restaurant, "Meh", 1).await.unwrap();
        assert_eq!(mean, 3.0);

        let mean = svc.delete(&other, last.id).await.unwrap();
        assert_eq!(mean, 4.0);
        let stored = repos.restaurants().find_by_id(restaurant).await.unwrap().unwrap();
        assert_eq!(stored.ratings, 4.0);
        assert_eq!(svc.list_for_restaurant(restaurant).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn rating_bounds_and_content_are_enforced() {
        let (svc, _, diner, _, restaurant) = setup().await;
        for rating in [0, 6, -1] {
            assert!(matches!(
                svc.create(&diner, restaurant, "x", rating).await,
                Err(DomainError::Validation(_))
            ));
        }
        assert!(matches!(
            svc.create(&diner, restaurant, "   ", 4).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn only_author_or_admin_deletes() {
        let (svc, _, diner, other, restaurant) = setup().await;
        let (review, _) = svc.create(&diner, restaurant, "Mine", 4).await.unwrap();

        assert!(matches!(
            svc.delete(&other, review.id).await,
            Err(DomainError::Forbidden(_))
        ));
        let admin = Actor::new(999, UserRole::Admin);
        assert_eq!(svc.delete(&admin, review.id).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn unknown_restaurant_is_not_found() {
        let (svc, _, diner, _, _) = setup().await;
        assert!(matches!(
            svc.create(&diner, 4040, "Hmm", 3).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            svc.list_for_restaurant(4040).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
