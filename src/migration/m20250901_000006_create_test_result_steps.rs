//! Migration: Create test_result_steps table.
//!
//! step_id is ON DELETE SET NULL: replacing a case's step generation must
//! not erase executed history.

use sea_orm_migration::prelude::*;

use crate::models::enums::{sql_value_list, StepOutcome};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let outcomes = sql_value_list(&StepOutcome::ALL, StepOutcome::as_str);
        let default_outcome = StepOutcome::default().as_str();

        manager
            .get_connection()
            .execute_unprepared(&format!(
                r#"
                CREATE TABLE test_result_steps (
                    id UUID PRIMARY KEY,
                    result_id UUID NOT NULL REFERENCES test_results(id) ON DELETE CASCADE,
                    step_id UUID REFERENCES test_steps(id) ON DELETE SET NULL,
                    "order" INTEGER NOT NULL CHECK ("order" >= 1),
                    action TEXT NOT NULL DEFAULT '',
                    expected_result TEXT NOT NULL DEFAULT '',
                    status VARCHAR(20) NOT NULL DEFAULT '{default_outcome}'
                        CHECK (status IN ({outcomes})),
                    comment TEXT NOT NULL DEFAULT '',

                    CONSTRAINT unique_result_step_order_per_result UNIQUE (result_id, "order")
                );

                -- Index for ordered listing within a result
                CREATE INDEX idx_test_result_steps_result_order ON test_result_steps(result_id, "order");
                "#,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_result_steps CASCADE;")
            .await?;

        Ok(())
    }
}
