use sea_orm_migration::prelude::*;

mod m20260801_000001_create_accounts;
mod m20260801_000002_create_verification_challenges;
mod m20260801_000003_create_authorizations;
mod m20260801_000004_create_access_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260801_000001_create_accounts::Migration),
            Box::new(m20260801_000002_create_verification_challenges::Migration),
            Box::new(m20260801_000003_create_authorizations::Migration),
            Box::new(m20260801_000004_create_access_events::Migration),
        ]
    }
}

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
