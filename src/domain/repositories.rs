//! Repository access for the domain layer

use super::booking::BookingRepository;
use super::restaurant::RestaurantRepository;
use super::review::ReviewRepository;
use super::user::UserRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let restaurant = repos.restaurants().find_by_id(7).await?;
///     let taken = repos.bookings().list_for_date(7, date).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn users(&self) -> &dyn UserRepository;
    fn restaurants(&self) -> &dyn RestaurantRepository;
    fn reviews(&self) -> &dyn ReviewRepository;
    fn bookings(&self) -> &dyn BookingRepository;
}
