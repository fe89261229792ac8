use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Authorizations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Authorizations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Authorizations::Email).string())
                    .col(ColumnDef::new(Authorizations::PhoneNumber).string())
                    .col(ColumnDef::new(Authorizations::EmailDomain).string())
                    .col(
                        ColumnDef::new(Authorizations::InviteCode)
                            .string()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Authorizations::Status).string().not_null())
                    .col(ColumnDef::new(Authorizations::MaxUses).integer())
                    .col(
                        ColumnDef::new(Authorizations::UsedCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Authorizations::ExpiresAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Authorizations::CreatedBy).uuid())
                    .col(ColumnDef::new(Authorizations::Note).string())
                    .col(
                        ColumnDef::new(Authorizations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Authorizations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Authorizations::Table)
                    .col(Authorizations::Email)
                    .name("idx_authorizations_email")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Authorizations::Table)
                    .col(Authorizations::PhoneNumber)
                    .name("idx_authorizations_phone_number")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Authorizations::Table)
                    .col(Authorizations::Status)
                    .name("idx_authorizations_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Authorizations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Authorizations {
    Table,
    Id,
    Email,
    PhoneNumber,
    EmailDomain,
    InviteCode,
    Status,
    MaxUses,
    UsedCount,
    ExpiresAt,
    CreatedBy,
    Note,
    CreatedAt,
    UpdatedAt,
}
