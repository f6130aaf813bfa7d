//! Database queries for test plans.

use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::test_plan::{self, ActiveModel, Entity as TestPlan};
use crate::error::{AppError, AppResult};
use crate::models::{PaginationParams, PlanFilter, PlanStatus};

use super::DbPool;

/// Represents a test plan to be inserted.
pub struct NewTestPlan {
    pub title: String,
    pub description: String,
    pub status: PlanStatus,
}

/// Field changes for a test plan update. `None` leaves the field as is.
#[derive(Default)]
pub struct PlanChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<PlanStatus>,
}

impl DbPool {
    /// Insert a new test plan.
    pub async fn insert_plan(&self, plan: NewTestPlan) -> AppResult<test_plan::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            title: Set(plan.title),
            description: Set(plan.description),
            status: Set(plan.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test plan: {}", e)))?;

        Ok(result)
    }

    /// Get a test plan by ID, or NotFound.
    pub async fn get_plan(&self, plan_id: Uuid) -> AppResult<test_plan::Model> {
        TestPlan::find_by_id(plan_id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test plan: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Test plan {}", plan_id)))
    }

    /// Apply field changes to a test plan.
    pub async fn update_plan(
        &self,
        plan_id: Uuid,
        changes: PlanChanges,
    ) -> AppResult<test_plan::Model> {
        let plan = self.get_plan(plan_id).await?;

        let mut active: ActiveModel = plan.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test plan: {}", e)))?;

        Ok(result)
    }

    /// Delete a test plan; cascades to cases, steps, results and attachments.
    pub async fn delete_plan(&self, plan_id: Uuid) -> AppResult<()> {
        let plan = self.get_plan(plan_id).await?;

        TestPlan::delete_by_id(plan.id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test plan: {}", e)))?;

        Ok(())
    }

    /// List test plans with filtering and pagination, newest first.
    pub async fn list_plans(
        &self,
        filter: &PlanFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<test_plan::Model>, u64)> {
        let mut select = TestPlan::find();

        if let Some(ref title) = filter.title {
            select = select.filter(
                Expr::col((test_plan::Entity, test_plan::Column::Title))
                    .ilike(format!("%{}%", title)),
            );
        }

        if let Some(ref status) = filter.status {
            select = select.filter(test_plan::Column::Status.eq(status));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test plans: {}", e)))?;

        let plans = select
            .order_by_desc(test_plan::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(u64::from(pagination.clamped_page_size()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test plans: {}", e)))?;

        Ok((plans, total))
    }
}
