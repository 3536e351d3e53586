use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Properties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Properties::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Properties::ListingType).string().not_null())
                    .col(ColumnDef::new(Properties::PropertyType).string().not_null())
                    .col(ColumnDef::new(Properties::Title).string().not_null())
                    .col(ColumnDef::new(Properties::Description).text())
                    .col(ColumnDef::new(Properties::Bhk).string())
                    .col(ColumnDef::new(Properties::Furnishing).string())
                    .col(ColumnDef::new(Properties::City).string().not_null())
                    .col(ColumnDef::new(Properties::Locality).string().not_null())
                    .col(ColumnDef::new(Properties::Address).string().not_null())
                    .col(ColumnDef::new(Properties::Latitude).double())
                    .col(ColumnDef::new(Properties::Longitude).double())
                    .col(ColumnDef::new(Properties::ContactNumber).string().not_null())
                    .col(ColumnDef::new(Properties::Rent).string())
                    .col(ColumnDef::new(Properties::SecurityDeposit).string())
                    .col(ColumnDef::new(Properties::Maintenance).string())
                    .col(ColumnDef::new(Properties::SalePrice).string())
                    .col(
                        ColumnDef::new(Properties::IsDraft)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Properties::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Properties::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Properties::VerificationStatus)
                            .string()
                            .not_null()
                            .default("NOT_VERIFIED"),
                    )
                    .col(ColumnDef::new(Properties::VerificationExpiry).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Properties::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Properties::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Properties::Table, Properties::OwnerId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Properties::Table)
                    .col(Properties::OwnerId)
                    .name("idx_properties_owner_id")
                    .to_owned(),
            )
            .await?;
        // Search path: live listings filtered by city.
        manager
            .create_index(
                Index::create()
                    .table(Properties::Table)
                    .col(Properties::IsAvailable)
                    .col(Properties::IsDraft)
                    .col(Properties::City)
                    .name("idx_properties_live_city")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Properties {
    Table,
    Id,
    OwnerId,
    ListingType,
    PropertyType,
    Title,
    Description,
    Bhk,
    Furnishing,
    City,
    Locality,
    Address,
    Latitude,
    Longitude,
    ContactNumber,
    Rent,
    SecurityDeposit,
    Maintenance,
    SalePrice,
    IsDraft,
    IsAvailable,
    IsVerified,
    VerificationStatus,
    VerificationExpiry,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
