use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AccessEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessEvents::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccessEvents::AccountId).uuid())
                    .col(ColumnDef::new(AccessEvents::Action).string().not_null())
                    .col(ColumnDef::new(AccessEvents::Detail).string())
                    .col(
                        ColumnDef::new(AccessEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AccessEvents::Table, AccessEvents::AccountId)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AccessEvents::Table)
                    .col(AccessEvents::AccountId)
                    .name("idx_access_events_account_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AccessEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AccessEvents {
    Table,
    Id,
    AccountId,
    Action,
    Detail,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
