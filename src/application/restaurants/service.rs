//! Restaurant service

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    Actor, DomainError, DomainResult, NewRestaurant, RepositoryProvider, Restaurant,
    RestaurantChanges, RestaurantFilter, RestaurantStatus, Review, User, UserRole,
};
use crate::shared::{PaginatedResult, PaginationParams};

const LISTING_ROLES: &[UserRole] = &[UserRole::BusinessOwner, UserRole::Admin];

/// A restaurant with its owner and reviews, as shown on the detail page
#[derive(Debug, Clone)]
pub struct RestaurantDetails {
    pub restaurant: Restaurant,
    pub owner: Option<User>,
    pub reviews: Vec<Review>,
}

/// An entry of the admin approval queue
#[derive(Debug, Clone)]
pub struct PendingRestaurant {
    pub restaurant: Restaurant,
    pub owner_name: String,
    pub owner_email: String,
}

/// Admin decision on a pending listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminDecision(pub RestaurantStatus);

impl AdminDecision {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        RestaurantStatus::parse_decision(raw).map(Self)
    }
}

#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    Approved(Restaurant),
    /// Rejected listings are deleted
    Rejected { id: i32 },
}

pub struct RestaurantService {
    repos: Arc<dyn RepositoryProvider>,
}

impl RestaurantService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    async fn load(&self, id: i32) -> DomainResult<Restaurant> {
        self.repos
            .restaurants()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", id))
    }

    /// Load a restaurant the actor may modify
    async fn load_owned(&self, actor: &Actor, id: i32) -> DomainResult<Restaurant> {
        let restaurant = self.load(id).await?;
        if !actor.owns_or_admin(Some(restaurant.owner_id)) {
            return Err(DomainError::Forbidden(
                "You do not manage this restaurant".into(),
            ));
        }
        Ok(restaurant)
    }

    /// Public search. Only approved listings are ever returned, whatever the
    /// filter says about status or owner.
    pub async fn search(
        &self,
        filter: RestaurantFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Restaurant>> {
        let filter = RestaurantFilter {
            status: Some(RestaurantStatus::Approved),
            owner_id: None,
            ..filter
        };
        self.repos.restaurants().search(filter, page).await
    }

    /// Detail view. Unapproved listings look absent to everyone but their
    /// owner and admins.
    pub async fn details(&self, viewer: Option<&Actor>, id: i32) -> DomainResult<RestaurantDetails> {
        let restaurant = self.load(id).await?;
        let visible = restaurant.is_public()
            || viewer.is_some_and(|a| a.owns_or_admin(Some(restaurant.owner_id)));
        if !visible {
            return Err(DomainError::not_found("Restaurant", id));
        }

        let owner = self.repos.users().find_by_id(restaurant.owner_id).await?;
        let reviews = self.repos.reviews().list_for_restaurant(id).await?;

        Ok(RestaurantDetails {
            restaurant,
            owner,
            reviews,
        })
    }

    pub async fn create(&self, actor: &Actor, mut new: NewRestaurant) -> DomainResult<Restaurant> {
        if !actor.has_any_role(LISTING_ROLES) {
            return Err(DomainError::Forbidden(
                "Only business owners can list restaurants".into(),
            ));
        }
        for (field, value) in [
            ("name", &new.name),
            ("address", &new.address),
            ("zipcode", &new.zipcode),
            ("cuisine", &new.cuisine),
            ("priceRange", &new.price_range),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::Validation(format!("{} is required", field)));
            }
        }

        new.owner_id = actor.user_id;
        let restaurant = self.repos.restaurants().create(new).await?;
        info!(
            restaurant_id = restaurant.id,
            owner_id = restaurant.owner_id,
            "Restaurant submitted for approval"
        );
        Ok(restaurant)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: i32,
        changes: RestaurantChanges,
    ) -> DomainResult<Restaurant> {
        self.load_owned(actor, id).await?;

        let required = [
            &changes.name,
            &changes.address,
            &changes.zipcode,
            &changes.cuisine,
            &changes.price_range,
        ];
        if required
            .iter()
            .any(|v| v.as_deref().is_some_and(|s| s.trim().is_empty()))
        {
            return Err(DomainError::Validation(
                "Required fields cannot be blank".into(),
            ));
        }

        self.repos.restaurants().update(id, changes).await
    }

    pub async fn delete(&self, actor: &Actor, id: i32) -> DomainResult<()> {
        self.load_owned(actor, id).await?;
        self.repos.restaurants().delete(id).await?;
        info!(restaurant_id = id, by = actor.user_id, "Restaurant deleted");
        Ok(())
    }

    /// Every listing the actor owns, in any status
    pub async fn mine(&self, actor: &Actor) -> DomainResult<Vec<Restaurant>> {
        if !actor.has_any_role(LISTING_ROLES) {
            return Err(DomainError::Forbidden("Unauthorized".into()));
        }
        self.repos.restaurants().list_by_owner(actor.user_id).await
    }

    // ── Approval workflow ───────────────────────────────────────

    pub async fn pending(&self, actor: &Actor) -> DomainResult<Vec<PendingRestaurant>> {
        require_admin(actor)?;

        let restaurants = self
            .repos
            .restaurants()
            .list_by_status(RestaurantStatus::Pending)
            .await?;

        let mut queue = Vec::with_capacity(restaurants.len());
        for restaurant in restaurants {
            let owner = self.repos.users().find_by_id(restaurant.owner_id).await?;
            let (owner_name, owner_email) = owner.map(|u| (u.name, u.email)).unwrap_or_default();
            queue.push(PendingRestaurant {
                restaurant,
                owner_name,
                owner_email,
            });
        }
        Ok(queue)
    }

    pub async fn decide(
        &self,
        actor: &Actor,
        id: i32,
        decision: AdminDecision,
    ) -> DomainResult<DecisionOutcome> {
        require_admin(actor)?;

        let restaurant = self.load(id).await?;
        let target = restaurant.status.transition_to(decision.0)?;

        match target {
            RestaurantStatus::Rejected => {
                self.repos.restaurants().delete(id).await?;
                info!(restaurant_id = id, admin_id = actor.user_id, "Restaurant rejected and removed");
                Ok(DecisionOutcome::Rejected { id })
            }
            status => {
                let updated = self.repos.restaurants().set_status(id, status).await?;
                info!(restaurant_id = id, admin_id = actor.user_id, "Restaurant approved");
                Ok(DecisionOutcome::Approved(updated))
            }
        }
    }
}

fn require_admin(actor: &Actor) -> DomainResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DomainError::Forbidden("Unauthorized".into()))
    }
}
