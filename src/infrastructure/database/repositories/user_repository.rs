//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::is_unique_violation;
use crate::domain::{DomainError, DomainResult, NewUser, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn role_to_domain(role: user::Role) -> UserRole {
    match role {
        user::Role::User => UserRole::User,
        user::Role::BusinessOwner => UserRole::BusinessOwner,
        user::Role::Admin => UserRole::Admin,
    }
}

fn role_to_entity(role: UserRole) -> user::Role {
    match role {
        UserRole::User => user::Role::User,
        UserRole::BusinessOwner => user::Role::BusinessOwner,
        UserRole::Admin => user::Role::Admin,
    }
}

pub(crate) fn model_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        name: m.name,
        email: m.email,
        password_hash: m.password_hash,
        role: role_to_domain(m.role),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn email_taken(err: sea_orm::DbErr) -> DomainError {
    if is_unique_violation(&err) {
        DomainError::Conflict("User already exists".to_string())
    } else {
        err.into()
    }
}

// ── UserRepository impl ─────────────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new: NewUser) -> DomainResult<User> {
        debug!("Creating user: {}", new.email);

        let now = Utc::now();
        let model = user::ActiveModel {
            name: Set(new.name),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            role: Set(role_to_entity(new.role)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await.map_err(email_taken)?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn update_profile(&self, id: i32, name: &str, email: &str) -> DomainResult<User> {
        debug!("Updating profile of user {}", id);

        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        let mut active: user::ActiveModel = existing.into();
        active.name = Set(name.to_string());
        active.email = Set(email.to_string());
        active.updated_at = Set(Utc::now());

        let saved = active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::Conflict("Email is already in use".to_string())
            } else {
                e.into()
            }
        })?;
        Ok(model_to_domain(saved))
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> DomainResult<()> {
        let existing = user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))?;

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64> {
        let n = user::Entity::find()
            .filter(user::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(n)
    }

    async fn recent(&self, limit: u64) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn created_timestamps_since(
        &self,
        since: DateTime<Utc>,
    ) -> DomainResult<Vec<DateTime<Utc>>> {
        let models = user::Entity::find()
            .filter(user::Column::CreatedAt.gte(since))
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(|m| m.created_at).collect())
    }
}
