use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PropertyVerifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PropertyVerifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PropertyVerifications::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(PropertyVerifications::RequestId).uuid().not_null())
                    .col(ColumnDef::new(PropertyVerifications::VerifiedBy).uuid().not_null())
                    .col(
                        ColumnDef::new(PropertyVerifications::ValidUntil)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PropertyVerifications::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PropertyVerifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PropertyVerifications::Table, PropertyVerifications::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_property_verifications_active \
                 ON property_verifications (property_id) WHERE is_active",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PropertyVerifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PropertyVerifications {
    Table,
    Id,
    PropertyId,
    RequestId,
    VerifiedBy,
    ValidUntil,
    IsActive,
    CreatedAt,
}

#[derive(Iden)]
enum Properties {
    Table,
    Id,
}
