//! Migration: Create test_plans table.

use sea_orm_migration::prelude::*;

use crate::models::enums::{sql_value_list, PlanStatus};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let statuses = sql_value_list(&PlanStatus::ALL, PlanStatus::as_str);
        let default_status = PlanStatus::default().as_str();

        manager
            .get_connection()
            .execute_unprepared(&format!(
                r#"
                CREATE TABLE test_plans (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting
                    title VARCHAR(255) NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    status VARCHAR(20) NOT NULL DEFAULT '{default_status}'
                        CHECK (status IN ({statuses})),
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Index for status filtering
                CREATE INDEX idx_test_plans_status ON test_plans(status);

                -- Index for listing by creation date
                CREATE INDEX idx_test_plans_created_at ON test_plans(created_at DESC);

                -- Trigger to update updated_at
                CREATE TRIGGER update_test_plans_updated_at
                    BEFORE UPDATE ON test_plans
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
                DROP TRIGGER IF EXISTS update_test_plans_updated_at ON test_plans;
                DROP TABLE IF EXISTS test_plans CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
