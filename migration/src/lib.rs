pub use sea_orm_migration::prelude::*;

mod m20260915_000001_create_tables;
mod m20260922_000001_create_interest_records;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260915_000001_create_tables::Migration),
            Box::new(m20260922_000001_create_interest_records::Migration),
        ]
    }
}
