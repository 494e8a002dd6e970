//! SeaORM implementation of ReviewRepository
//!
//! The review write opens each transaction so the recompute runs under the
//! write lock and concurrent reviews queue on SQLite's busy timeout.

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use crate::domain::review::mean_rating;
use crate::domain::{DomainError, DomainResult, NewReview, Review, ReviewRepository};
use crate::infrastructure::database::entities::{restaurant, review};

pub struct SeaOrmReviewRepository {
    db: DatabaseConnection,
}

impl SeaOrmReviewRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_domain(m: review::Model) -> Review {
    Review {
        id: m.id,
        content: m.content,
        rating: m.rating,
        user_id: m.user_id,
        restaurant_id: m.restaurant_id,
        created_at: m.created_at,
    }
}

/// Recompute the mean over every review of `restaurant_id` and store it
async fn refresh_rating<C: ConnectionTrait>(conn: &C, restaurant_id: i32) -> DomainResult<f64> {
    let ratings: Vec<i32> = review::Entity::find()
        .filter(review::Column::RestaurantId.eq(restaurant_id))
        .all(conn)
        .await?
        .into_iter()
        .map(|r| r.rating)
        .collect();
    let mean = mean_rating(&ratings);

    let existing = restaurant::Entity::find_by_id(restaurant_id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Restaurant", restaurant_id))?;

    let mut active: restaurant::ActiveModel = existing.into();
    active.ratings = Set(mean);
    active.update(conn).await?;

    debug!(
        "Restaurant {} rating is now {:.2} over {} reviews",
        restaurant_id,
        mean,
        ratings.len()
    );
    Ok(mean)
}

#[async_trait]
impl ReviewRepository for SeaOrmReviewRepository {
    async fn create_and_refresh_rating(&self, new: NewReview) -> DomainResult<(Review, f64)> {
        let restaurant_id = new.restaurant_id;
        let model = review::ActiveModel {
            content: Set(new.content),
            rating: Set(new.rating),
            user_id: Set(new.user_id),
            restaurant_id: Set(new.restaurant_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let txn = self.db.begin().await?;
        let saved = model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                DomainError::not_found("Restaurant", restaurant_id)
            }
            _ => DomainError::from(e),
        })?;
        let mean = refresh_rating(&txn, saved.restaurant_id).await?;

        txn.commit().await?;
        Ok((model_to_domain(saved), mean))
    }

    async fn delete_and_refresh_rating(&self, id: i32) -> DomainResult<f64> {
        // A review never moves between restaurants, so the lookup can run
        // ahead of the transaction.
        let restaurant_id = review::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", id))?
            .restaurant_id;

        let txn = self.db.begin().await?;
        let deleted = review::Entity::delete_by_id(id).exec(&txn).await?;
        if deleted.rows_affected == 0 {
            return Err(DomainError::not_found("Review", id));
        }
        let mean = refresh_rating(&txn, restaurant_id).await?;

        txn.commit().await?;
        Ok(mean)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Review>> {
        let model = review::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list_for_restaurant(&self, restaurant_id: i32) -> DomainResult<Vec<Review>> {
        let models = review::Entity::find()
            .filter(review::Column::RestaurantId.eq(restaurant_id))
            .order_by_desc(review::Column::CreatedAt)
            .order_by_desc(review::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
