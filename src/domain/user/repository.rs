use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{NewUser, User};
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> DomainResult<User>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn update_profile(&self, id: i32, name: &str, email: &str) -> DomainResult<User>;
    async fn update_password(&self, id: i32, password_hash: &str) -> DomainResult<()>;

    async fn count(&self) -> DomainResult<u64>;
    async fn count_created_since(&self, since: DateTime<Utc>) -> DomainResult<u64>;
    /// Newest users first
    async fn recent(&self, limit: u64) -> DomainResult<Vec<User>>;
    async fn created_timestamps_since(&self, since: DateTime<Utc>)
        -> DomainResult<Vec<DateTime<Utc>>>;
}
