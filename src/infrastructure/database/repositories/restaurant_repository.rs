//! SeaORM implementation of RestaurantRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select, Set,
};

use crate::domain::{
    DomainError, DomainResult, NewRestaurant, Restaurant, RestaurantChanges, RestaurantFilter,
    RestaurantRepository, RestaurantStatus,
};
use crate::infrastructure::database::entities::restaurant;
use crate::shared::{PaginatedResult, PaginationParams};

pub struct SeaOrmRestaurantRepository {
    db: DatabaseConnection,
}

impl SeaOrmRestaurantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_domain(s: restaurant::Status) -> RestaurantStatus {
    match s {
        restaurant::Status::Pending => RestaurantStatus::Pending,
        restaurant::Status::Approved => RestaurantStatus::Approved,
        restaurant::Status::Rejected => RestaurantStatus::Rejected,
    }
}

fn status_to_entity(s: RestaurantStatus) -> restaurant::Status {
    match s {
        RestaurantStatus::Pending => restaurant::Status::Pending,
        RestaurantStatus::Approved => restaurant::Status::Approved,
        RestaurantStatus::Rejected => restaurant::Status::Rejected,
    }
}

pub(crate) fn model_to_domain(m: restaurant::Model) -> Restaurant {
    Restaurant {
        id: m.id,
        name: m.name,
        description: m.description,
        address: m.address,
        zipcode: m.zipcode,
        cuisine: m.cuisine,
        price_range: m.price_range,
        ratings: m.ratings,
        image_url: m.image_url,
        owner_id: m.owner_id,
        status: status_to_domain(m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Case-insensitive `LIKE '%needle%'` on a text column
fn contains_ci(
    query: Select<restaurant::Entity>,
    column: restaurant::Column,
    needle: &str,
) -> Select<restaurant::Entity> {
    let pattern = format!("%{}%", needle.to_lowercase());
    query.filter(Expr::expr(Func::lower(Expr::col(column))).like(pattern))
}

fn apply_filter(filter: &RestaurantFilter) -> Select<restaurant::Entity> {
    let mut query = restaurant::Entity::find();

    if let Some(name) = filter.name.as_deref().filter(|s| !s.is_empty()) {
        query = contains_ci(query, restaurant::Column::Name, name);
    }
    if let Some(cuisine) = filter.cuisine.as_deref().filter(|s| !s.is_empty()) {
        query = contains_ci(query, restaurant::Column::Cuisine, cuisine);
    }
    if let Some(zipcode) = filter.zipcode.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(restaurant::Column::Zipcode.eq(zipcode));
    }
    if let Some(price) = filter.price_range.as_deref().filter(|s| !s.is_empty()) {
        query = query.filter(restaurant::Column::PriceRange.eq(price));
    }
    if let Some(status) = filter.status {
        query = query.filter(restaurant::Column::Status.eq(status_to_entity(status)));
    }
    if let Some(owner_id) = filter.owner_id {
        query = query.filter(restaurant::Column::OwnerId.eq(owner_id));
    }

    query
}

// ── RestaurantRepository impl ───────────────────────────────────

#[async_trait]
impl RestaurantRepository for SeaOrmRestaurantRepository {
    async fn create(&self, new: NewRestaurant) -> DomainResult<Restaurant> {
        debug!("Creating restaurant '{}' for owner {}", new.name, new.owner_id);

        let now = Utc::now();
        let model = restaurant::ActiveModel {
            name: Set(new.name),
            description: Set(new.description),
            address: Set(new.address),
            zipcode: Set(new.zipcode),
            cuisine: Set(new.cuisine),
            price_range: Set(new.price_range),
            ratings: Set(0.0),
            image_url: Set(new.image_url),
            owner_id: Set(new.owner_id),
            status: Set(restaurant::Status::Pending),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Restaurant>> {
        let model = restaurant::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn search(
        &self,
        filter: RestaurantFilter,
        page: PaginationParams,
    ) -> DomainResult<PaginatedResult<Restaurant>> {
        let query = apply_filter(&filter)
            .order_by_asc(restaurant::Column::Name)
            .order_by_asc(restaurant::Column::Id);

        let paginator = query.paginate(&self.db, u64::from(page.limit));
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(page.page_index()).await?;

        Ok(PaginatedResult::new(
            models.into_iter().map(model_to_domain).collect(),
            total,
            page.page,
            page.limit,
        ))
    }

    async fn list_by_owner(&self, owner_id: i32) -> DomainResult<Vec<Restaurant>> {
        let models = restaurant::Entity::find()
            .filter(restaurant::Column::OwnerId.eq(owner_id))
            .order_by_desc(restaurant::Column::CreatedAt)
            .order_by_desc(restaurant::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn list_by_status(&self, status: RestaurantStatus) -> DomainResult<Vec<Restaurant>> {
        let models = restaurant::Entity::find()
            .filter(restaurant::Column::Status.eq(status_to_entity(status)))
            .order_by_asc(restaurant::Column::CreatedAt)
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, id: i32, changes: RestaurantChanges) -> DomainResult<Restaurant> {
        debug!("Updating restaurant {}", id);

        let existing = restaurant::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", id))?;

        if changes.is_empty() {
            return Ok(model_to_domain(existing));
        }

        let mut active: restaurant::ActiveModel = existing.into();
        if let Some(v) = changes.name {
            active.name = Set(v);
        }
        if let Some(v) = changes.description {
            active.description = Set(v);
        }
        if let Some(v) = changes.address {
            active.address = Set(v);
        }
        if let Some(v) = changes.zipcode {
            active.zipcode = Set(v);
        }
        if let Some(v) = changes.cuisine {
            active.cuisine = Set(v);
        }
        if let Some(v) = changes.price_range {
            active.price_range = Set(v);
        }
        if let Some(v) = changes.image_url {
            active.image_url = Set(v);
        }
        active.updated_at = Set(Utc::now());

        let saved = active.update(&self.db).await?;
        Ok(model_to_domain(saved))
    }

    async fn set_status(&self, id: i32, status: RestaurantStatus) -> DomainResult<Restaurant> {
        debug!("Setting restaurant {} status to {}", id, status);

        let existing = restaurant::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", id))?;

        let mut active: restaurant::ActiveModel = existing.into();
        active.status = Set(status_to_entity(status));
        active.updated_at = Set(Utc::now());

        let saved = active.update(&self.db).await?;
        Ok(model_to_domain(saved))
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        debug!("Deleting restaurant {}", id);

        let existing = restaurant::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Restaurant", id))?;
        existing.delete(&self.db).await?;
        Ok(())
    }

    async fn count_by_status(&self, status: RestaurantStatus) -> DomainResult<u64> {
        let n = restaurant::Entity::find()
            .filter(restaurant::Column::Status.eq(status_to_entity(status)))
            .count(&self.db)
            .await?;
        Ok(n)
    }

    async fn created_timestamps_since(
        &self,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<DateTime<Utc>>> {
        let models = restaurant::Entity::find()
            .filter(restaurant::Column::CreatedAt.gte(since))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.created_at).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use super::*;
    use crate::domain::{RepositoryProvider, UserRole};
    use crate::infrastructure::database::{test_db, SeaOrmRepositoryProvider};

    #[tokio::test]
    async fn new_restaurants_are_pending_with_zero_rating() {
        let repos = SeaOrmRepositoryProvider::new(test_db().await);
        let owner = fixtures::user(&repos, "owner@example.com", UserRole::BusinessOwner).await;

        let r = repos
            .restaurants()
            .create(fixtures::new_restaurant(owner.id, "Trattoria"))
            .await
            .unwrap();
        assert_eq!(r.status, RestaurantStatus::Pending);
        assert_eq!(r.ratings, 0.0);
        assert_eq!(r.owner_id, owner.id);
    }

    #[tokio::test]
    async fn search_filters_and_paginates() {
        let repos = SeaOrmRepositoryProvider::new(test_db().await);
        let owner = fixtures::user(&repos, "owner@example.com", UserRole::BusinessOwner).await;
        for name in ["Pasta Place", "Pizza Palace", "Sushi Bar"] {
            fixtures::approved_restaurant(&repos, owner.id, name).await;
        }
        repos
            .restaurants()
            .create(fixtures::new_restaurant(owner.id, "Pending Pasta"))
            .await
            .unwrap();

        let approved = RestaurantFilter {
            status: Some(RestaurantStatus::Approved),
            ..Default::default()
        };

        let all = repos
            .restaurants()
            .search(approved.clone(), PaginationParams::normalized(1, 2))
            .await
            .unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.total_pages, 2);
        assert_eq!(all.items.len(), 2);
        assert_eq!(all.items[0].name, "Pasta Place");

        let pasta = repos
            .restaurants()
            .search(
                RestaurantFilter {
                    name: Some("PASTA".into()),
                    ..approved.clone()
                },
                PaginationParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(pasta.total, 1);
        assert_eq!(pasta.items[0].name, "Pasta Place");

        let none = repos
            .restaurants()
            .search(
                RestaurantFilter {
                    zipcode: Some("99999".into()),
                    ..approved
                },
                PaginationParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(none.total, 0);
        assert!(none.items.is_empty());
    }

    #[tokio::test]
    async fn update_touches_only_given_fields() {
        let repos = SeaOrmRepositoryProvider::new(test_db().await);
        let owner = fixtures::user(&repos, "owner@example.com", UserRole::BusinessOwner).await;
        let r = fixtures::approved_restaurant(&repos, owner.id, "Old Name").await;

        let updated = repos
            .restaurants()
            .update(
                r.id,
                RestaurantChanges {
                    name: Some("New Name".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "New Name");
        assert_eq!(updated.address, r.address);
        assert_eq!(updated.status, RestaurantStatus::Approved);
    }

    #[tokio::test]
    async fn optional_fields_can_be_cleared() {
        let repos = SeaOrmRepositoryProvider::new(test_db().await);
        let owner = fixtures::user(&repos, "owner@example.com", UserRole::BusinessOwner).await;
        let r = fixtures::approved_restaurant(&repos, owner.id, "Bistro").await;
        assert!(r.description.is_some());

        let with_image = repos
            .restaurants()
            .update(
                r.id,
                RestaurantChanges {
                    image_url: Some(Some("https://img.example.com/bistro.jpg".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(
            with_image.image_url.as_deref(),
            Some("https://img.example.com/bistro.jpg")
        );
        assert_eq!(with_image.description, r.description);

        let cleared = repos
            .restaurants()
            .update(
                r.id,
                RestaurantChanges {
                    description: Some(None),
                    image_url: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.description, None);
        assert_eq!(cleared.image_url, None);
        assert_eq!(cleared.name, "Bistro");
    }

    #[tokio::test]
    async fn status_listing_and_counts() {
        let repos = SeaOrmRepositoryProvider::new(test_db().await);
        let owner = fixtures::user(&repos, "owner@example.com", UserRole::BusinessOwner).await;
        fixtures::approved_restaurant(&repos, owner.id, "A").await;
        repos
            .restaurants()
            .create(fixtures::new_restaurant(owner.id, "B"))
            .await
            .unwrap();

        let pending = repos
            .restaurants()
            .list_by_status(RestaurantStatus::Pending)
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "B");
        assert_eq!(
            repos
                .restaurants()
                .count_by_status(RestaurantStatus::Approved)
                .await
                .unwrap(),
            1
        );
        assert_eq!(repos.restaurants().list_by_owner(owner.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let repos = SeaOrmRepositoryProvider::new(test_db().await);
        let owner = fixtures::user(&repos, "owner@example.com", UserRole::BusinessOwner).await;
        let r = fixtures::approved_restaurant(&repos, owner.id, "Gone").await;

        repos.restaurants().delete(r.id).await.unwrap();
        assert!(repos.restaurants().find_by_id(r.id).await.unwrap().is_none());
        assert!(matches!(
            repos.restaurants().delete(r.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
