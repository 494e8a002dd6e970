//! Restaurant DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::RestaurantDetails;
use crate::domain::{NewRestaurant, Restaurant, RestaurantChanges, RestaurantFilter, User};
use crate::interfaces::http::modules::reviews::ReviewDto;
use crate::shared::PaginationParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RestaurantSearchQuery {
    /// Case-insensitive substring
    pub name: Option<String>,
    /// Case-insensitive substring
    pub cuisine: Option<String>,
    pub zipcode: Option<String>,
    /// Exact, e.g. `$$`
    pub price_range: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl RestaurantSearchQuery {
    pub fn filter(&self) -> RestaurantFilter {
        RestaurantFilter {
            name: self.name.clone(),
            cuisine: self.cuisine.clone(),
            zipcode: self.zipcode.clone(),
            price_range: self.price_range.clone(),
            ..Default::default()
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams::normalized(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        )
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub zipcode: String,
    pub cuisine: String,
    pub price_range: String,
    /// Mean of all review ratings, 0.0 without reviews
    pub ratings: f64,
    pub image_url: Option<String>,
    pub owner_id: i32,
    /// `pending`, `approved` or `rejected`
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Restaurant> for RestaurantDto {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            address: r.address,
            zipcode: r.zipcode,
            cuisine: r.cuisine,
            price_range: r.price_range,
            ratings: r.ratings,
            image_url: r.image_url,
            owner_id: r.owner_id,
            status: r.status.to_string(),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<User> for OwnerSummary {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetailDto {
    #[serde(flatten)]
    pub restaurant: RestaurantDto,
    pub owner: Option<OwnerSummary>,
    /// Newest first
    pub reviews: Vec<ReviewDto>,
}

impl From<RestaurantDetails> for RestaurantDetailDto {
    fn from(d: RestaurantDetails) -> Self {
        Self {
            restaurant: d.restaurant.into(),
            owner: d.owner.map(OwnerSummary::from),
            reviews: d.reviews.into_iter().map(ReviewDto::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub name: String,
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 300, message = "must be 1-300 characters"))]
    pub address: String,
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub zipcode: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub cuisine: String,
    #[validate(length(min = 1, max = 10, message = "must be 1-10 characters"))]
    pub price_range: String,
    #[validate(url(message = "must be a URL"))]
    pub image_url: Option<String>,
}

impl CreateRestaurantRequest {
    pub fn into_new(self, owner_id: i32) -> NewRestaurant {
        NewRestaurant {
            name: self.name,
            description: self.description,
            address: self.address,
            zipcode: self.zipcode,
            cuisine: self.cuisine,
            price_range: self.price_range,
            image_url: self.image_url,
            owner_id,
        }
    }
}

/// Absent fields stay as they are. Ratings and status cannot be set here.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRestaurantRequest {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub name: Option<String>,
    /// `null` or an empty string clears the description
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<Option<String>>,
    #[validate(length(max = 300, message = "must be at most 300 characters"))]
    pub address: Option<String>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub zipcode: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub cuisine: Option<String>,
    #[validate(length(max = 10, message = "must be at most 10 characters"))]
    pub price_range: Option<String>,
    /// `null` clears the image
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    #[validate(url(message = "must be a URL"))]
    pub image_url: Option<Option<String>>,
}

/// Keep an explicit `null` apart from an absent field: absent stays `None`
/// through `#[serde(default)]`, `null` becomes `Some(None)`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl From<UpdateRestaurantRequest> for RestaurantChanges {
    fn from(r: UpdateRestaurantRequest) -> Self {
        Self {
            name: r.name,
            description: r
                .description
                .map(|d| d.filter(|text| !text.trim().is_empty())),
            address: r.address,
            zipcode: r.zipcode,
            cuisine: r.cuisine,
            price_range: r.price_range,
            image_url: r.image_url,
        }
    }
}
