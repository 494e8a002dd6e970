//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::{
    BookingRepository, RepositoryProvider, RestaurantRepository, ReviewRepository, UserRepository,
};

use super::booking_repository::SeaOrmBookingRepository;
use super::restaurant_repository::SeaOrmRestaurantRepository;
use super::review_repository::SeaOrmReviewRepository;
use super::user_repository::SeaOrmUserRepository;

/// All repositories over one connection pool.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let restaurant = repos.restaurants().find_by_id(7).await?;
/// let reviews = repos.reviews().list_for_restaurant(7).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
    users: SeaOrmUserRepository,
    restaurants: SeaOrmRestaurantRepository,
    reviews: SeaOrmReviewRepository,
    bookings: SeaOrmBookingRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: SeaOrmUserRepository::new(db.clone()),
            restaurants: SeaOrmRestaurantRepository::new(db.clone()),
            reviews: SeaOrmReviewRepository::new(db.clone()),
            bookings: SeaOrmBookingRepository::new(db.clone()),
            db,
        }
    }

    /// Underlying connection, used by the health check
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn restaurants(&self) -> &dyn RestaurantRepository {
        &self.restaurants
    }

    fn reviews(&self) -> &dyn ReviewRepository {
        &self.reviews
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }
}
