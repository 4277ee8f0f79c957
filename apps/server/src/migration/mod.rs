//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20241001_000001_create_games;
mod m20241001_000002_create_rounds;
mod m20241001_000003_create_turns;
mod m20241001_000004_create_metadata;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20241001_000001_create_games::Migration),
            Box::new(m20241001_000002_create_rounds::Migration),
            Box::new(m20241001_000003_create_turns::Migration),
            Box::new(m20241001_000004_create_metadata::Migration),
        ]
    }
}
