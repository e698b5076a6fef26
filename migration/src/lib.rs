pub use sea_orm_migration::prelude::*;

mod m20260512_094500_initial_schema;
mod m20260601_000000_posts;
mod m20260623_000000_connected_accounts;
mod m20260711_000000_brand_profiles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260512_094500_initial_schema::Migration),
            Box::new(m20260601_000000_posts::Migration),
            Box::new(m20260623_000000_connected_accounts::Migration),
            Box::new(m20260711_000000_brand_profiles::Migration),
        ]
    }
}
