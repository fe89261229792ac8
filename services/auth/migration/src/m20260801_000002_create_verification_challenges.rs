use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VerificationChallenges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationChallenges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VerificationChallenges::AccountId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationChallenges::Channel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationChallenges::Code)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationChallenges::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VerificationChallenges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                VerificationChallenges::Table,
                                VerificationChallenges::AccountId,
                            )
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One active code per account and channel; resend upserts this row.
        manager
            .create_index(
                Index::create()
                    .table(VerificationChallenges::Table)
                    .col(VerificationChallenges::AccountId)
                    .col(VerificationChallenges::Channel)
                    .unique()
                    .name("uq_verification_challenges_account_channel")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationChallenges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VerificationChallenges {
    Table,
    Id,
    AccountId,
    Channel,
    Code,
    ExpiresAt,
    CreatedAt,
}

#[derive(Iden)]
enum Accounts {
    Table,
    Id,
}
