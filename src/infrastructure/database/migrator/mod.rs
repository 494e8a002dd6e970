//! Database migrations

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_restaurants;
mod m20250101_000003_create_reviews;
mod m20250101_000004_create_bookings;
mod m20250101_000005_add_booking_slot_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_restaurants::Migration),
            Box::new(m20250101_000003_create_reviews::Migration),
            Box::new(m20250101_000004_create_bookings::Migration),
            Box::new(m20250101_000005_add_booking_slot_index::Migration),
        ]
    }
}
