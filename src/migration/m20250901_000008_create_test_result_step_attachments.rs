//! Migration: Create test_result_step_attachments table.

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
                CREATE TABLE test_result_step_attachments (
                    id UUID PRIMARY KEY,
                    result_step_id UUID NOT NULL REFERENCES test_result_steps(id) ON DELETE CASCADE,
                    file_key VARCHAR(500),
                    file_name VARCHAR(255),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_test_result_step_attachments_result_step_id
                    ON test_result_step_attachments(result_step_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_result_step_attachments CASCADE;")
            .await?;

        Ok(())
    }
}
