//! Migration: Create profiles table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::BusinessName).string().not_null())
                    .col(ColumnDef::new(Profiles::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Profiles::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::Phone).string().null())
                    .col(ColumnDef::new(Profiles::Address).string().null())
                    .col(ColumnDef::new(Profiles::Wilaya).string().null())
                    .col(
                        ColumnDef::new(Profiles::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Profiles::SubscriptionTier)
                            .string_len(16)
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(Profiles::SubscriptionExpiry)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Registration queue filters on the active flag
        manager
            .create_index(
                Index::create()
                    .name("idx_profiles_is_active")
                    .table(Profiles::Table)
                    .col(Profiles::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Profiles {
    Table,
    Id,
    BusinessName,
    Role,
    Email,
    Phone,
    Address,
    Wilaya,
    IsActive,
    SubscriptionTier,
    SubscriptionExpiry,
    CreatedAt,
    UpdatedAt,
}
