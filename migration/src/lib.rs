pub use sea_orm_migration::prelude::*;

mod m20260105_090000_create_schema;
mod m20260105_090100_add_ai_keys;
mod m20260105_090200_add_site_settings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_090000_create_schema::Migration),
            Box::new(m20260105_090100_add_ai_keys::Migration),
            Box::new(m20260105_090200_add_site_settings::Migration),
        ]
    }
}
