//! Create bookings table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;
use super::m20250101_000002_create_restaurants::Restaurants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).integer())
                    .col(ColumnDef::new(Bookings::RestaurantId).integer().not_null())
                    .col(ColumnDef::new(Bookings::Date).date().not_null())
                    .col(ColumnDef::new(Bookings::Time).string_len(5).not_null())
                    .col(
                        ColumnDef::new(Bookings::NumberOfPeople)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::CustomerName).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerEmail).string().not_null())
                    .col(ColumnDef::new(Bookings::CustomerPhone).string())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(16)
                            .not_null()
                            .default("confirmed"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_restaurant")
                            .from(Bookings::Table, Bookings::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_restaurant_date")
                    .table(Bookings::Table)
                    .col(Bookings::RestaurantId)
                    .col(Bookings::Date)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Bookings {
    Table,
    Id,
    UserId,
    RestaurantId,
    Date,
    Time,
    NumberOfPeople,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    Status,
    CreatedAt,
    UpdatedAt,
}
