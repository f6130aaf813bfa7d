//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_users;
mod m20250901_000002_create_test_plans;
mod m20250901_000003_create_test_cases;
mod m20250901_000004_create_test_steps;
mod m20250901_000005_create_test_results;
mod m20250901_000006_create_test_result_steps;
mod m20250901_000007_create_test_step_attachments;
mod m20250901_000008_create_test_result_step_attachments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_users::Migration),
            Box::new(m20250901_000002_create_test_plans::Migration),
            Box::new(m20250901_000003_create_test_cases::Migration),
            Box::new(m20250901_000004_create_test_steps::Migration),
            Box::new(m20250901_000005_create_test_results::Migration),
            Box::new(m20250901_000006_create_test_result_steps::Migration),
            Box::new(m20250901_000007_create_test_step_attachments::Migration),
            Box::new(m20250901_000008_create_test_result_step_attachments::Migration),
        ]
    }
}
