//! Restaurant repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{NewRestaurant, Restaurant, RestaurantChanges, RestaurantFilter, RestaurantStatus};
use crate::domain::DomainResult;
use crate::shared::{PaginatedResult, PaginationParams};

#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Insert a new listing in `pending` state with a zero rating
    async fn create(&self, restaurant: NewRestaurant) -> DomainResult<Restaurant>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Restaurant>>;

    /// Filtered, paginated search ordered by name
    async fn search(
        &self,
        filter: RestaurantFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Restaurant>>;

    async fn list_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Restaurant>>;

    /// Oldest first, so admins review in submission order
    async fn list_by_status(&self, status: RestaurantStatus) -> DomainResult<Vec<Restaurant>>;

    async fn update(&self, id: i32, changes: RestaurantChanges) -> DomainResult<Restaurant>;

    async fn set_status(&self, id: i32, status: RestaurantStatus) -> DomainResult<Restaurant>;

    /// Delete a restaurant; its reviews and bookings go with it
    async fn delete(&self, id: i32) -> DomainResult<()>;

    async fn count_by_status(&self, status: RestaurantStatus) -> DomainResult<u64>;

    async fn created_timestamps_since(&self, since: DateTime<Utc>)
        -> DomainResult<Vec<DateTime<Utc>>>;
}
