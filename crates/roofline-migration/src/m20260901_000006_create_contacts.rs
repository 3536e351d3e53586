use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Contacts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Contacts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Contacts::PropertyId).uuid().not_null())
                    .col(ColumnDef::new(Contacts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Contacts::UserName).string().not_null())
                    .col(ColumnDef::new(Contacts::UserPhone).string().not_null())
                    .col(ColumnDef::new(Contacts::Message).text())
                    .col(
                        ColumnDef::new(Contacts::UserDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contacts::OwnerDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Contacts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contacts::Table, Contacts::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Contacts::Table)
                    .col(Contacts::UserId)
                    .col(Contacts::PropertyId)
                    .unique()
                    .name("uq_contacts_user_property")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Contacts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Contacts {
    Table,
    Id,
    PropertyId,
    UserId,
    UserName,
    UserPhone,
    Message,
    UserDeleted,
    OwnerDeleted,
    CreatedAt,
}

#[derive(Iden)]
enum Properties {
    Table,
    Id,
}
