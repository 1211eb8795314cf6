pub use sea_orm_migration::prelude::*;

mod iden;
mod m20250601_000001_account_tables;
mod m20250601_000002_event_tables;
mod m20250610_000001_chat_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_account_tables::Migration),
            Box::new(m20250601_000002_event_tables::Migration),
            Box::new(m20250610_000001_chat_tables::Migration),
        ]
    }
}
