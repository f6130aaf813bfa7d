//! Migration: Create test_steps table.
//!
//! (case_id, "order") is unique: the order number is the step's identity
//! within its case's current generation.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE test_steps (
                    id UUID PRIMARY KEY,
                    case_id UUID NOT NULL REFERENCES test_cases(id) ON DELETE CASCADE,
                    "order" INTEGER NOT NULL CHECK ("order" >= 1),
                    action TEXT NOT NULL DEFAULT '',
                    expected_result TEXT NOT NULL DEFAULT '',

                    CONSTRAINT unique_step_order_per_case UNIQUE (case_id, "order")
                );

                -- Index for ordered listing within a case
                CREATE INDEX idx_test_steps_case_order ON test_steps(case_id, "order");
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_steps CASCADE;")
            .await?;

        Ok(())
    }
}
