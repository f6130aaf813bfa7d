//! Migration: Create test_results table.

use sea_orm_migration::prelude::*;

use crate::models::enums::{sql_value_list, Browser, Os, Verdict};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let verdicts = sql_value_list(&Verdict::ALL, Verdict::as_str);
        let browsers = sql_value_list(&Browser::ALL, Browser::as_str);
        let oses = sql_value_list(&Os::ALL, Os::as_str);
        let default_verdict = Verdict::default().as_str();
        let default_browser = Browser::default().as_str();
        let default_os = Os::default().as_str();

        manager
            .get_connection()
            .execute_unprepared(&format!(
                r#"
                CREATE TABLE test_results (
                    id UUID PRIMARY KEY,
                    case_id UUID NOT NULL REFERENCES test_cases(id) ON DELETE CASCADE,
                    result VARCHAR(20) NOT NULL DEFAULT '{default_verdict}'
                        CHECK (result IN ({verdicts})),
                    browser VARCHAR(20) NOT NULL DEFAULT '{default_browser}'
                        CHECK (browser IN ({browsers})),
                    os VARCHAR(20) NOT NULL DEFAULT '{default_os}'
                        CHECK (os IN ({oses})),
                    tester_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,

                    -- Execution time; written once at insert
                    executed_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for the latest-result projection: newest result per case
                CREATE INDEX idx_test_results_case_executed ON test_results(case_id, executed_at DESC, id DESC);

                -- Index for result filtering
                CREATE INDEX idx_test_results_result ON test_results(result);

                -- Index for tester lookups
                CREATE INDEX idx_test_results_tester_id ON test_results(tester_id);

                -- Trigger to update updated_at
                CREATE TRIGGER update_test_results_updated_at
                    BEFORE UPDATE ON test_results
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
                DROP TRIGGER IF EXISTS update_test_results_updated_at ON test_results;
                DROP TABLE IF EXISTS test_results CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
