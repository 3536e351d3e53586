use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VerificationRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VerificationRequests::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(VerificationRequests::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(VerificationRequests::Status).string().not_null())
                    .col(
                        ColumnDef::new(VerificationRequests::PaymentStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerificationRequests::Amount).integer().not_null())
                    .col(ColumnDef::new(VerificationRequests::PaymentReference).string())
                    .col(ColumnDef::new(VerificationRequests::Latitude).double())
                    .col(ColumnDef::new(VerificationRequests::Longitude).double())
                    .col(ColumnDef::new(VerificationRequests::CapturedAddress).text())
                    .col(
                        ColumnDef::new(VerificationRequests::PhotoKeys)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(VerificationRequests::AssignedTo).uuid())
                    .col(ColumnDef::new(VerificationRequests::ReviewedBy).uuid())
                    .col(ColumnDef::new(VerificationRequests::ReviewNotes).text())
                    .col(ColumnDef::new(VerificationRequests::ValidFrom).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(VerificationRequests::ValidUntil).timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(VerificationRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(VerificationRequests::Table, VerificationRequests::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(VerificationRequests::Table)
                    .col(VerificationRequests::OwnerId)
                    .name("idx_verification_requests_owner_id")
                    .to_owned(),
            )
            .await?;

        // One in-flight request per property. sea-query has no partial index builder.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_verification_requests_in_flight \
                 ON verification_requests (property_id) \
                 WHERE status IN ('PENDING_PAYMENT', 'PAYMENT_COMPLETED', 'UNDER_REVIEW')",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationRequests::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VerificationRequests {
    Table,
    Id,
    PropertyId,
    OwnerId,
    Status,
    PaymentStatus,
    Amount,
    PaymentReference,
    Latitude,
    Longitude,
    CapturedAddress,
    PhotoKeys,
    AssignedTo,
    ReviewedBy,
    ReviewNotes,
    ValidFrom,
    ValidUntil,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Properties {
    Table,
    Id,
}
