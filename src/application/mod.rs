//! Application layer: use-case services
//!
//! Services take an [`Actor`](crate::domain::Actor) for anything that needs
//! authorization and return `DomainResult`. HTTP handlers stay thin and
//! delegate here.

pub mod analytics;
pub mod bookings;
pub mod identity;
pub mod restaurants;
pub mod reviews;

pub use analytics::{AnalyticsService, BookingCounts, DailyTrend, PlatformSummary, RestaurantCounts};
pub use bookings::{BookingInput, BookingService};
pub use identity::{AuthResult, IdentityService, LoginPortal};
pub use restaurants::{
    AdminDecision, DecisionOutcome, PendingRestaurant, RestaurantDetails, RestaurantService,
};
pub use reviews::ReviewService;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::domain::RepositoryProvider;
    use crate::infrastructure::database::{test_db, SeaOrmRepositoryProvider};

    pub async fn repos() -> Arc<dyn RepositoryProvider> {
        Arc::new(SeaOrmRepositoryProvider::new(test_db().await))
    }
}
