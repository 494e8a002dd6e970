//! At most one confirmed booking per (restaurant, date, time)
//!
//! Partial indexes are not expressible through the schema builder, so the
//! statement is issued as raw SQL. SQLite and PostgreSQL both accept it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const SLOT_INDEX: &str = "uq_bookings_confirmed_slot";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS {} \
                 ON bookings (restaurant_id, date, time) \
                 WHERE status = 'confirmed'",
                SLOT_INDEX
            ))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(&format!("DROP INDEX IF EXISTS {}", SLOT_INDEX))
            .await?;
        Ok(())
    }
}
