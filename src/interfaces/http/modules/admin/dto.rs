//! Admin DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{
    BookingCounts, DailyTrend, DecisionOutcome, PendingRestaurant, PlatformSummary,
    RestaurantCounts,
};
use crate::domain::{RestaurantStatus, User};
use crate::interfaces::http::modules::restaurants::RestaurantDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingRestaurantDto {
    #[serde(flatten)]
    pub restaurant: RestaurantDto,
    pub owner_name: String,
    pub owner_email: String,
}

impl From<PendingRestaurant> for PendingRestaurantDto {
    fn from(p: PendingRestaurant) -> Self {
        Self {
            restaurant: p.restaurant.into(),
            owner_name: p.owner_name,
            owner_email: p.owner_email,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StatusDecisionRequest {
    /// `approved` or `rejected`
    #[validate(length(min = 1, message = "is required"))]
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DecisionResponse {
    pub id: i32,
    pub status: String,
    /// Absent when the listing was rejected, since it is deleted
    pub restaurant: Option<RestaurantDto>,
}

impl From<DecisionOutcome> for DecisionResponse {
    fn from(outcome: DecisionOutcome) -> Self {
        match outcome {
            DecisionOutcome::Approved(r) => Self {
                id: r.id,
                status: r.status.to_string(),
                restaurant: Some(r.into()),
            },
            DecisionOutcome::Rejected { id } => Self {
                id,
                status: RestaurantStatus::Rejected.to_string(),
                restaurant: None,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentUserDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for RecentUserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestaurantCountsDto {
    pub pending: u64,
    pub approved: u64,
}

impl From<RestaurantCounts> for RestaurantCountsDto {
    fn from(c: RestaurantCounts) -> Self {
        Self {
            pending: c.pending,
            approved: c.approved,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingCountsDto {
    pub total: u64,
    pub confirmed: u64,
    pub cancelled: u64,
}

impl From<BookingCounts> for BookingCountsDto {
    fn from(c: BookingCounts) -> Self {
        Self {
            total: c.total,
            confirmed: c.confirmed,
            cancelled: c.cancelled,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDto {
    pub total_users: u64,
    pub new_users_last_7_days: u64,
    /// Newest first
    pub recent_users: Vec<RecentUserDto>,
    pub restaurants: RestaurantCountsDto,
    pub bookings: BookingCountsDto,
}

impl From<PlatformSummary> for AnalyticsDto {
    fn from(s: PlatformSummary) -> Self {
        Self {
            total_users: s.total_users,
            new_users_last_7_days: s.new_users_last_7_days,
            recent_users: s.recent_users.into_iter().map(RecentUserDto::from).collect(),
            restaurants: s.restaurants.into(),
            bookings: s.bookings.into(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    /// Days to look back, default 30, at most 365
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendDto {
    pub date: NaiveDate,
    pub new_users: u64,
    pub new_restaurants: u64,
    pub new_bookings: u64,
}

impl From<DailyTrend> for DailyTrendDto {
    fn from(t: DailyTrend) -> Self {
        Self {
            date: t.date,
            new_users: t.new_users,
            new_restaurants: t.new_restaurants,
            new_bookings: t.new_bookings,
        }
    }
}
