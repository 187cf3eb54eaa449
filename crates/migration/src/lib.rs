//! # Database Migrations
//!
//! Schema migrations for Ladle, managed through `sea-orm-migration`.
//! Production runs on PostgreSQL; the integration tests run the same
//! migrations against in-memory SQLite.

pub use sea_orm_migration::prelude::*;

pub mod db;

mod m20250310_000001_create_users_table;
mod m20250310_000002_create_email_verifications_table;
mod m20250310_000003_create_token_tables;
mod m20250310_000004_create_catalog_tables;
mod m20250310_000005_create_interactions_tables;

/// The main migrator that coordinates all migration operations.
///
/// Migrations are executed in the order they appear in this list.
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250310_000001_create_users_table::Migration),
            Box::new(m20250310_000002_create_email_verifications_table::Migration),
            Box::new(m20250310_000003_create_token_tables::Migration),
            Box::new(m20250310_000004_create_catalog_tables::Migration),
            Box::new(m20250310_000005_create_interactions_tables::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_registered_in_order() {
        let migrations = Migrator::migrations();
        assert_eq!(migrations.len(), 5);

        let names: Vec<String> = migrations.iter().map(|m| m.name().to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "Migrations must be listed chronologically");
    }
}
