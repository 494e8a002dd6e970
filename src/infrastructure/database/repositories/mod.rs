//! SeaORM repository implementations
//!
//! One repository per aggregate plus the [`SeaOrmRepositoryProvider`] that
//! bundles them over a single connection pool.

pub mod booking_repository;
pub mod repository_provider;
pub mod restaurant_repository;
pub mod review_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

/// `true` when `err` is a unique or primary key violation
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::{NewRestaurant, NewUser, Restaurant, RepositoryProvider, RestaurantStatus, User, UserRole};

    pub async fn user(repos: &dyn RepositoryProvider, email: &str, role: UserRole) -> User {
        repos
            .users()
            .create(NewUser {
                name: email.split('@').next().unwrap_or("user").to_string(),
                email: email.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                role,
            })
            .await
            .unwrap()
    }

    pub fn new_restaurant(owner_id: i32, name: &str) -> NewRestaurant {
        NewRestaurant {
            name: name.to_string(),
            description: Some("Family run".to_string()),
            address: "1 Main St".to_string(),
            zipcode: "10001".to_string(),
            cuisine: "Italian".to_string(),
            price_range: "$$".to_string(),
            image_url: None,
            owner_id,
        }
    }

    pub async fn approved_restaurant(repos: &dyn RepositoryProvider, owner_id: i32, name: &str) -> Restaurant {
        let r = repos
            .restaurants()
            .create(new_restaurant(owner_id, name))
            .await
            .unwrap();
        repos
            .restaurants()
            .set_status(r.id, RestaurantStatus::Approved)
            .await
            .unwrap()
    }
}
