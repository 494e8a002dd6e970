//! Restaurant domain entity

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Listing status.
///
/// `Pending` is the only state an admin decision can leave. A rejected
/// restaurant is deleted right after the decision, so `Rejected` is never
/// observed in storage for long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestaurantStatus {
    Pending,
    Approved,
    Rejected,
}

impl RestaurantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Parse an admin decision. Only `approved` and `rejected` are decisions.
    pub fn parse_decision(s: &str) -> DomainResult<Self> {
        match Self::from_str(s) {
            Some(status @ (Self::Approved | Self::Rejected)) => Ok(status),
            _ => Err(DomainError::Validation(format!("Invalid status '{}'", s))),
        }
    }

    /// Validate `self -> target` against the approval workflow.
    pub fn transition_to(self, target: Self) -> DomainResult<Self> {
        match (self, target) {
            (Self::Pending, Self::Approved | Self::Rejected) => Ok(target),
            (from, to) => Err(DomainError::InvalidState(format!(
                "Restaurant cannot move from {} to {}",
                from, to
            ))),
        }
    }
}

impl std::fmt::Display for RestaurantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub zipcode: String,
    pub cuisine: String,
    pub price_range: String,
    /// Mean of all review ratings, `0.0` without reviews
    pub ratings: f64,
    pub image_url: Option<String>,
    pub owner_id: i32,
    pub status: RestaurantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Restaurant {
    pub fn is_public(&self) -> bool {
        self.status == RestaurantStatus::Approved
    }

    pub fn accepts_bookings(&self) -> bool {
        self.is_public()
    }
}

#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub zipcode: String,
    pub cuisine: String,
    pub price_range: String,
    pub image_url: Option<String>,
    pub owner_id: i32,
}

/// Descriptive fields an owner may edit. `None` leaves a field untouched;
/// on the optional fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct RestaurantChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub address: Option<String>,
    pub zipcode: Option<String>,
    pub cuisine: Option<String>,
    pub price_range: Option<String>,
    pub image_url: Option<Option<String>>,
}

impl RestaurantChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.zipcode.is_none()
            && self.cuisine.is_none()
            && self.price_range.is_none()
            && self.image_url.is_none()
    }
}

/// Search criteria. `name` and `cuisine` are case-insensitive substring
/// matches, the rest are exact.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub name: Option<String>,
    pub cuisine: Option<String>,
    pub zipcode: Option<String>,
    pub price_range: Option<String>,
    pub status: Option<RestaurantStatus>,
    pub owner_id: Option<i32>,
}
