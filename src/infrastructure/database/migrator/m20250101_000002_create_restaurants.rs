//! Create restaurants table

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Description).text())
                    .col(ColumnDef::new(Restaurants::Address).string().not_null())
                    .col(ColumnDef::new(Restaurants::Zipcode).string().not_null())
                    .col(ColumnDef::new(Restaurants::Cuisine).string().not_null())
                    .col(ColumnDef::new(Restaurants::PriceRange).string().not_null())
                    .col(
                        ColumnDef::new(Restaurants::Ratings)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Restaurants::ImageUrl).string())
                    .col(ColumnDef::new(Restaurants::OwnerId).integer().not_null())
                    .col(
                        ColumnDef::new(Restaurants::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Restaurants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Restaurants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_restaurants_owner")
                            .from(Restaurants::Table, Restaurants::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurants_owner")
                    .table(Restaurants::Table)
                    .col(Restaurants::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_restaurants_status")
                    .table(Restaurants::Table)
                    .col(Restaurants::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Restaurants {
    Table,
    Id,
    Name,
    Description,
    Address,
    Zipcode,
    Cuisine,
    PriceRange,
    Ratings,
    ImageUrl,
    OwnerId,
    Status,
    CreatedAt,
    UpdatedAt,
}
