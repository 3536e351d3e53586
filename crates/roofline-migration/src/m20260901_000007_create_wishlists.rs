use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wishlists::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Wishlists::UserId).uuid().not_null())
                    .col(ColumnDef::new(Wishlists::PropertyId).uuid().not_null())
                    .col(
                        ColumnDef::new(Wishlists::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(Wishlists::UserId)
                            .col(Wishlists::PropertyId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Wishlists::Table, Wishlists::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Wishlists::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Wishlists {
    Table,
    UserId,
    PropertyId,
    CreatedAt,
}

#[derive(Iden)]
enum Properties {
    Table,
    Id,
}
