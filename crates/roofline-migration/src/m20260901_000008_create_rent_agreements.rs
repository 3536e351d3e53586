use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RentAgreements::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RentAgreements::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(RentAgreements::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(RentAgreements::CreatorPhone).string().not_null())
                    .col(ColumnDef::new(RentAgreements::OwnerName).string().not_null())
                    .col(ColumnDef::new(RentAgreements::OwnerPhone).string().not_null())
                    .col(ColumnDef::new(RentAgreements::OwnerAddress).text().not_null())
                    .col(ColumnDef::new(RentAgreements::TenantName).string().not_null())
                    .col(ColumnDef::new(RentAgreements::TenantPhone).string().not_null())
                    .col(ColumnDef::new(RentAgreements::TenantAddress).text().not_null())
                    .col(ColumnDef::new(RentAgreements::PropertyAddress).text().not_null())
                    .col(ColumnDef::new(RentAgreements::RentAmount).string().not_null())
                    .col(ColumnDef::new(RentAgreements::SecurityDeposit).string().not_null())
                    .col(ColumnDef::new(RentAgreements::Maintenance).string())
                    .col(ColumnDef::new(RentAgreements::AgreementDuration).string().not_null())
                    .col(ColumnDef::new(RentAgreements::RentStartDate).string().not_null())
                    .col(ColumnDef::new(RentAgreements::LockInPeriod).string().not_null())
                    .col(ColumnDef::new(RentAgreements::NoticePeriod).string().not_null())
                    .col(ColumnDef::new(RentAgreements::RentDueDay).string().not_null())
                    .col(
                        ColumnDef::new(RentAgreements::PaymentStatus)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(RentAgreements::PaymentReference).string())
                    .col(
                        ColumnDef::new(RentAgreements::DocumentGenerated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RentAgreements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RentAgreements::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_rent_agreements_creator_phone", RentAgreements::CreatorPhone),
            ("idx_rent_agreements_owner_phone", RentAgreements::OwnerPhone),
            ("idx_rent_agreements_tenant_phone", RentAgreements::TenantPhone),
        ] {
            manager
                .create_index(
                    Index::create()
                        .table(RentAgreements::Table)
                        .col(column)
                        .name(name)
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RentAgreements::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RentAgreements {
    Table,
    Id,
    CreatorId,
    CreatorPhone,
    OwnerName,
    OwnerPhone,
    OwnerAddress,
    TenantName,
    TenantPhone,
    TenantAddress,
    PropertyAddress,
    RentAmount,
    SecurityDeposit,
    Maintenance,
    AgreementDuration,
    RentStartDate,
    LockInPeriod,
    NoticePeriod,
    RentDueDay,
    PaymentStatus,
    PaymentReference,
    DocumentGenerated,
    CreatedAt,
    UpdatedAt,
}
