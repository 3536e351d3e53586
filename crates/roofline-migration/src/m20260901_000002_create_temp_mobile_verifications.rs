use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TempMobileVerifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TempMobileVerifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TempMobileVerifications::Mobile)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TempMobileVerifications::Otp).string().not_null())
                    .col(
                        ColumnDef::new(TempMobileVerifications::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TempMobileVerifications::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(TempMobileVerifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TempMobileVerifications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TempMobileVerifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TempMobileVerifications {
    Table,
    Id,
    Mobile,
    Otp,
    ExpiresAt,
    Verified,
    CreatedAt,
    UpdatedAt,
}
