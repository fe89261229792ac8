use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::PhoneNumber)
                            .string()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::Email).string().unique_key())
                    .col(ColumnDef::new(Accounts::FirstName).string().not_null())
                    .col(ColumnDef::new(Accounts::LastName).string().not_null())
                    .col(ColumnDef::new(Accounts::TaxId).string())
                    .col(ColumnDef::new(Accounts::Role).small_integer().not_null())
                    .col(ColumnDef::new(Accounts::Position).string())
                    .col(ColumnDef::new(Accounts::Department).string())
                    .col(ColumnDef::new(Accounts::Active).boolean().not_null())
                    .col(
                        ColumnDef::new(Accounts::AuthorizationStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string())
                    .col(
                        ColumnDef::new(Accounts::EmailVerified)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::FailedLoginAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Accounts::LockUntil).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::Modules).json_binary().not_null())
                    .col(ColumnDef::new(Accounts::Protocol).string())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Accounts::Table)
                    .col(Accounts::AuthorizationStatus)
                    .name("idx_accounts_authorization_status")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
    PhoneNumber,
    Email,
    FirstName,
    LastName,
    TaxId,
    Role,
    Position,
    Department,
    Active,
    AuthorizationStatus,
    PasswordHash,
    EmailVerified,
    FailedLoginAttempts,
    LockUntil,
    Modules,
    Protocol,
    CreatedAt,
    UpdatedAt,
}
