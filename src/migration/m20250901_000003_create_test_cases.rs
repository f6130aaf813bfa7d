//! Migration: Create test_cases table.
//!
//! No latest_result/executed_at columns: those are projected from
//! test_results on read.

use sea_orm_migration::prelude::*;

use crate::models::enums::{sql_value_list, CaseStatus};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let statuses = sql_value_list(&CaseStatus::ALL, CaseStatus::as_str);
        let default_status = CaseStatus::default().as_str();

        manager
            .get_connection()
            .execute_unprepared(&format!(
                r#"
                CREATE TABLE test_cases (
                    id UUID PRIMARY KEY,
                    plan_id UUID NOT NULL REFERENCES test_plans(id) ON DELETE CASCADE,
                    title VARCHAR(255) NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    status VARCHAR(20) NOT NULL DEFAULT '{default_status}'
                        CHECK (status IN ({statuses})),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for plan lookup
                CREATE INDEX idx_test_cases_plan_id ON test_cases(plan_id);

                -- Index for status filtering
                CREATE INDEX idx_test_cases_status ON test_cases(status);

                -- Trigger to update updated_at
                CREATE TRIGGER update_test_cases_updated_at
                    BEFORE UPDATE ON test_cases
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_test_cases_updated_at ON test_cases;
                DROP TABLE IF EXISTS test_cases CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
