//! Analytics service

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::domain::{
    Actor, BookingStatus, DomainError, DomainResult, RepositoryProvider, RestaurantStatus, User,
};

pub const RECENT_USERS: u64 = 10;
pub const DEFAULT_TREND_DAYS: u32 = 30;
pub const MAX_TREND_DAYS: u32 = 365;

/// Rejected listings are deleted, so only live statuses are counted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantCounts {
    pub pending: u64,
    pub approved: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingCounts {
    pub total: u64,
    pub confirmed: u64,
    pub cancelled: u64,
}

#[derive(Debug, Clone)]
pub struct PlatformSummary {
    pub total_users: u64,
    pub new_users_last_7_days: u64,
    /// Newest first
    pub recent_users: Vec<User>,
    pub restaurants: RestaurantCounts,
    pub bookings: BookingCounts,
}

/// New records created on one UTC day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub new_users: u64,
    pub new_restaurants: u64,
    pub new_bookings: u64,
}

pub struct AnalyticsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AnalyticsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn summary(&self, actor: &Actor) -> DomainResult<PlatformSummary> {
        require_admin(actor)?;

        let users = self.repos.users();
        let restaurants = self.repos.restaurants();
        let bookings = self.repos.bookings();
        let week_ago = Utc::now() - Duration::days(7);

        Ok(PlatformSummary {
            total_users: users.count().await?,
            new_users_last_7_days: users.count_created_since(week_ago).await?,
            recent_users: users.recent(RECENT_USERS).await?,
            restaurants: RestaurantCounts {
                pending: restaurants.count_by_status(RestaurantStatus::Pending).await?,
                approved: restaurants.count_by_status(RestaurantStatus::Approved).await?,
            },
            bookings: BookingCounts {
                total: bookings.count(None).await?,
                confirmed: bookings.count(Some(BookingStatus::Confirmed)).await?,
                cancelled: bookings.count(Some(BookingStatus::Cancelled)).await?,
            },
        })
    }

    /// One entry per UTC day, oldest first, ending today. `days` is clamped
    /// to `1..=MAX_TREND_DAYS`.
    pub async fn trends(&self, actor: &Actor, days: u32) -> DomainResult<Vec<DailyTrend>> {
        require_admin(actor)?;

        let days = days.clamp(1, MAX_TREND_DAYS);
        let today = Utc::now().date_naive();
        let first_day = today - Duration::days(i64::from(days) - 1);
        let since = first_day.and_time(NaiveTime::MIN).and_utc();

        let users = self.repos.users().created_timestamps_since(since).await?;
        let restaurants = self
            .repos
            .restaurants()
            .created_timestamps_since(since)
            .await?;
        let bookings = self.repos.bookings().created_timestamps_since(since).await?;

        Ok(bucket_by_day(first_day, days, &users, &restaurants, &bookings))
    }
}

fn require_admin(actor: &Actor) -> DomainResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden("Unauthorized".into()))
    }
}

fn bucket_by_day(
    first_day: NaiveDate,
    days: u32,
    users: &[DateTime<Utc>],
    restaurants: &[DateTime<Utc>],
    bookings: &[DateTime<Utc>],
) -> Vec<DailyTrend> {
    let mut buckets: BTreeMap<NaiveDate, DailyTrend> = first_day
        .iter_days()
        .take(days as usize)
        .map(|date| {
            (
                date,
                DailyTrend {
                    date,
                    new_users: 0,
                    new_restaurants: 0,
                    new_bookings: 0,
                },
            )
        })
        .collect();

    for ts in users {
        if let Some(b) = buckets.get_mut(&ts.date_naive()) {
            b.new_users += 1;
        }
    }
    for ts in restaurants {
        if let Some(b) = buckets.get_mut(&ts.date_naive()) {
            b.new_restaurants += 1;
        }
    }
    for ts in bookings {
        if let Some(b) = buckets.get_mut(&ts.date_naive()) {
            b.new_bookings += 1;
        }
    }

    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::repos;
    use crate::application::{AdminDecision, RestaurantService};
    use crate::domain::{NewRestaurant, NewUser, UserRole};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn buckets_cover_every_day_in_order() {
        let first = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let users = [at(2025, 3, 1, 9), at(2025, 3, 1, 23), at(2025, 3, 3, 0)];
        let bookings = [at(2025, 3, 2, 12), at(2025, 2, 28, 12)];

        let trend = bucket_by_day(first, 3, &users, &[], &bookings);

        assert_eq!(trend.len(), 3);
        assert_eq!(trend[0].date, first);
        assert_eq!(trend[0].new_users, 2);
        assert_eq!(trend[1].new_bookings, 1);
        assert_eq!(trend[2].new_users, 1);
        assert_eq!(trend.iter().map(|t| t.new_restaurants).sum::<u64>(), 0);
    }

    #[tokio::test]
    async fn summary_and_trends_require_admin() {
        let svc = AnalyticsService::new(repos().await);
        let diner = Actor::new(1, UserRole::User);
        assert!(matches!(svc.summary(&diner).await, Err(DomainError::Forbidden(_))));
        assert!(matches!(svc.trends(&diner, 7).await, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn summary_counts_users() {
        let repos = repos().await;
        for i in 0..12 {
            repos
                .users()
                .create(NewUser {
                    name: format!("User {}", i),
                    email: format!("u{}@example.com", i),
                    password_hash: "x".into(),
                    role: UserRole::User,
                })
                .await
                .unwrap();
        }
        let svc = AnalyticsService::new(repos);
        let admin = Actor::new(1, UserRole::Admin);

        let summary = svc.summary(&admin).await.unwrap();
        assert_eq!(summary.total_users, 12);
        assert_eq!(summary.new_users_last_7_days, 12);
        assert_eq!(summary.recent_users.len(), RECENT_USERS as usize);
        assert_eq!(summary.bookings, BookingCounts::default());

        let trend = svc.trends(&admin, 0).await.unwrap();
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].new_users, 12);
        assert_eq!(svc.trends(&admin, 10_000).await.unwrap().len(), MAX_TREND_DAYS as usize);
    }

    #[tokio::test]
    async fn rejected_listings_leave_the_counts() {
        let repos = repos().await;
        let owner = repos
            .users()
            .create(NewUser {
                name: "Owner".into(),
                email: "owner@example.com".into(),
                password_hash: "x".into(),
                role: UserRole::BusinessOwner,
            })
            .await
            .unwrap();
        let mut ids = Vec::new();
        for name in ["Bistro", "Diner", "Grill"] {
            let r = repos
                .restaurants()
                .create(NewRestaurant {
                    name: name.into(),
                    description: None,
                    address: "1 Main St".into(),
                    zipcode: "10001".into(),
                    cuisine: "Italian".into(),
                    price_range: "$$".into(),
                    image_url: None,
                    owner_id: owner.id,
                })
                .await
                .unwrap();
            ids.push(r.id);
        }

        let admin = Actor::new(99, UserRole::Admin);
        let listings = RestaurantService::new(repos.clone());
        listings
            .decide(&admin, ids[0], AdminDecision::parse("approved").unwrap())
            .await
            .unwrap();
        listings
            .decide(&admin, ids[1], AdminDecision::parse("rejected").unwrap())
            .await
            .unwrap();

        let summary = AnalyticsService::new(repos).summary(&admin).await.unwrap();
        assert_eq!(
            summary.restaurants,
            RestaurantCounts {
                pending: 1,
                approved: 1,
            }
        );
    }
}
