//! Database queries for test cases, including the latest-result projection.
//!
//! A case's `latest_result` and `executed_at` are never stored. Every
//! read path that needs them goes through [`DbPool::latest_result_for_case`]
//! or the batched [`DbPool::latest_results_for_cases`], which query the
//! result history ordered by execution time.

use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseBackend, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, Statement,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entity::test_case::{self, ActiveModel, Entity as TestCase};
use crate::entity::test_result::{self, Entity as TestResult};
use crate::error::{AppError, AppResult};
use crate::models::{CaseFilter, CaseStatus, PaginationParams};

use super::DbPool;

/// Correlated subquery selecting the verdict of a case's newest result.
/// Shared by the `latest_result` filter so the projection logic exists once.
const LATEST_RESULT_SUBQUERY: &str = "(SELECT r.result FROM test_results r \
     WHERE r.case_id = test_cases.id \
     ORDER BY r.executed_at DESC, r.id DESC LIMIT 1)";

/// Represents a test case to be inserted.
pub struct NewTestCase {
    pub plan_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
}

/// Field changes for a test case update. `None` leaves the field as is.
#[derive(Default)]
pub struct CaseChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
}

impl DbPool {
    /// Insert a new test case under a plan.
    pub async fn insert_case(&self, case: NewTestCase) -> AppResult<test_case::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            plan_id: Set(case.plan_id),
            title: Set(case.title),
            description: Set(case.description),
            status: Set(case.status.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test case: {}", e)))?;

        Ok(result)
    }

    /// Get a test case scoped to its plan, or NotFound.
    ///
    /// The plan id comes from the URL; a case id under the wrong plan is
    /// indistinguishable from a missing case.
    pub async fn get_case_in_plan(
        &self,
        plan_id: Uuid,
        case_id: Uuid,
    ) -> AppResult<test_case::Model> {
        TestCase::find_by_id(case_id)
            .filter(test_case::Column::PlanId.eq(plan_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test case: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Test case {}", case_id)))
    }

    /// Apply field changes to a test case.
    pub async fn update_case(
        &self,
        plan_id: Uuid,
        case_id: Uuid,
        changes: CaseChanges,
    ) -> AppResult<test_case::Model> {
        let case = self.get_case_in_plan(plan_id, case_id).await?;

        let mut active: ActiveModel = case.into();
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
            .map_err(|e| AppError::Database(format!("Failed to update test case: {}", e)))?;

        Ok(result)
    }

    /// Delete a test case; cascades to steps, results and attachments.
    pub async fn delete_case(&self, plan_id: Uuid, case_id: Uuid) -> AppResult<()> {
        let case = self.get_case_in_plan(plan_id, case_id).await?;

        TestCase::delete_by_id(case.id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test case: {}", e)))?;

        Ok(())
    }

    /// List a plan's test cases with filtering and pagination, newest first.
    pub async fn list_cases(
        &self,
        plan_id: Uuid,
        filter: &CaseFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<test_case::Model>, u64)> {
        let mut select = TestCase::find().filter(test_case::Column::PlanId.eq(plan_id));

        if let Some(ref title) = filter.title {
            select = select.filter(
                Expr::col((test_case::Entity, test_case::Column::Title))
                    .ilike(format!("%{}%", title)),
            );
        }

        if let Some(ref status) = filter.status {
            select = select.filter(test_case::Column::Status.eq(status));
        }

        // Filter on the derived latest result via the projection subquery.
        if let Some(ref latest) = filter.latest_result {
            select = select.filter(Expr::cust_with_values(
                format!("{LATEST_RESULT_SUBQUERY} = $1"),
                [latest.clone()],
            ));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test cases: {}", e)))?;

        let cases = select
            .order_by_desc(test_case::Column::CreatedAt)
            .offset(pagination.offset())
            .limit(u64::from(pagination.clamped_page_size()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test cases: {}", e)))?;

        Ok((cases, total))
    }

    /// Project the most recently executed result for one case.
    pub async fn latest_result_for_case(
        &self,
        case_id: Uuid,
    ) -> AppResult<Option<test_result::Model>> {
        let result = TestResult::find()
            .filter(test_result::Column::CaseId.eq(case_id))
            .order_by_desc(test_result::Column::ExecutedAt)
            .order_by_desc(test_result::Column::Id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to project latest result: {}", e)))?;

        Ok(result)
    }

    /// Project the most recently executed result for each of `case_ids`.
    ///
    /// One query for the whole page; cases with no results are absent
    /// from the returned map.
    pub async fn latest_results_for_cases(
        &self,
        case_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, test_result::Model>> {
        if case_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: String = (1..=case_ids.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "SELECT DISTINCT ON (case_id) * FROM test_results \
             WHERE case_id IN ({placeholders}) \
             ORDER BY case_id, executed_at DESC, id DESC"
        );

        let values: Vec<sea_orm::Value> = case_ids
            .iter()
            .map(|id| sea_orm::Value::from(*id))
            .collect();

        let results = TestResult::find()
            .from_raw_sql(Statement::from_sql_and_values(
                DatabaseBackend::Postgres,
                &sql,
                values,
            ))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to project latest results: {}", e)))?;

        Ok(results.into_iter().map(|r| (r.case_id, r)).collect())
    }
}
