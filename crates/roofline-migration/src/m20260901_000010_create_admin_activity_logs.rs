use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminActivityLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminActivityLogs::AdminId).uuid().not_null())
                    .col(ColumnDef::new(AdminActivityLogs::Action).string().not_null())
                    .col(ColumnDef::new(AdminActivityLogs::EntityType).string().not_null())
                    .col(ColumnDef::new(AdminActivityLogs::EntityId).uuid())
                    .col(
                        ColumnDef::new(AdminActivityLogs::Details)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminActivityLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AdminActivityLogs::Table)
                    .col(AdminActivityLogs::AdminId)
                    .col(AdminActivityLogs::CreatedAt)
                    .name("idx_admin_activity_logs_admin_created")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminActivityLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminActivityLogs {
    Table,
    Id,
    AdminId,
    Action,
    EntityType,
    EntityId,
    Details,
    CreatedAt,
}
