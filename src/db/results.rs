//! Database queries for test results.

use chrono::Utc;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use uuid::Uuid;

use crate::entity::test_case;
use crate::entity::test_result::{self, ActiveModel, Entity as TestResult};
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::{
    Browser, ConfigurationFilter, Os, PaginationParams, ResultFilter, Verdict,
};

use super::DbPool;

/// Represents a test result to be inserted.
pub struct NewTestResult {
    pub case_id: Uuid,
    pub result: Verdict,
    pub browser: Browser,
    pub os: Os,
    pub tester_id: Uuid,
}

/// Field changes for a test result update. `None` leaves the field as is.
/// `executed_at` is immutable after creation.
#[derive(Default)]
pub struct ResultChanges {
    pub result: Option<Verdict>,
    pub browser: Option<Browser>,
    pub os: Option<Os>,
}

/// Which parent the result listing is scoped to.
pub enum ResultScope {
    Plan(Uuid),
    Case(Uuid),
}

impl DbPool {
    /// Insert a new test result. `executed_at` is set here, once.
    pub async fn insert_result(&self, result: NewTestResult) -> AppResult<test_result::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            case_id: Set(result.case_id),
            result: Set(result.result.as_str().to_string()),
            browser: Set(result.browser.as_str().to_string()),
            os: Set(result.os.as_str().to_string()),
            tester_id: Set(result.tester_id),
            executed_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(self.connection()).await.map_err(|e| {
            match e.sql_err() {
                Some(sea_orm::SqlErr::ForeignKeyConstraintViolation(_)) => {
                    AppError::InvalidInput("Unknown tester".to_string())
                }
                _ => AppError::Database(format!("Failed to insert test result: {}", e)),
            }
        })?;

        Ok(inserted)
    }

    /// Get a test result scoped to its case, or NotFound.
    pub async fn get_result_in_case(
        &self,
        case_id: Uuid,
        result_id: Uuid,
    ) -> AppResult<test_result::Model> {
        TestResult::find_by_id(result_id)
            .filter(test_result::Column::CaseId.eq(case_id))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test result: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Test result {}", result_id)))
    }

    /// Apply field changes to a test result.
    pub async fn update_result(
        &self,
        case_id: Uuid,
        result_id: Uuid,
        changes: ResultChanges,
    ) -> AppResult<test_result::Model> {
        let result = self.get_result_in_case(case_id, result_id).await?;

        let mut active: ActiveModel = result.into();
        if let Some(verdict) = changes.result {
            active.result = Set(verdict.as_str().to_string());
        }
        if let Some(browser) = changes.browser {
            active.browser = Set(browser.as_str().to_string());
        }
        if let Some(os) = changes.os {
            active.os = Set(os.as_str().to_string());
        }
        active.updated_at = Set(Utc::now());

        let updated = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test result: {}", e)))?;

        Ok(updated)
    }

    /// Delete a test result; cascades to its result steps and attachments.
    pub async fn delete_result(&self, case_id: Uuid, result_id: Uuid) -> AppResult<()> {
        let result = self.get_result_in_case(case_id, result_id).await?;

        TestResult::delete_by_id(result.id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete test result: {}", e)))?;

        Ok(())
    }

    /// List results for a case or a whole plan, newest execution first.
    ///
    /// A malformed `configuration` filter matches zero rows by contract,
    /// short-circuited here without touching the database.
    pub async fn list_results(
        &self,
        scope: ResultScope,
        filter: &ResultFilter,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<test_result::Model>, u64)> {
        let configuration = ConfigurationFilter::parse(filter.configuration.as_deref());
        if configuration == ConfigurationFilter::Invalid {
            return Ok((Vec::new(), 0));
        }

        let mut select = TestResult::find();
        let mut cases_joined = false;

        match scope {
            ResultScope::Case(case_id) => {
                select = select.filter(test_result::Column::CaseId.eq(case_id));
            }
            ResultScope::Plan(plan_id) => {
                select = select
                    .join(JoinType::InnerJoin, test_result::Relation::Case.def())
                    .filter(test_case::Column::PlanId.eq(plan_id));
                cases_joined = true;
            }
        }

        if let Some(ref case_title) = filter.case {
            if !cases_joined {
                select = select.join(JoinType::InnerJoin, test_result::Relation::Case.def());
            }
            select = select.filter(
                Expr::col((test_case::Entity, test_case::Column::Title))
                    .ilike(format!("%{}%", case_title)),
            );
        }

        if let Some(ref result) = filter.result {
            select = select.filter(test_result::Column::Result.eq(result));
        }

        if let Some(ref tester) = filter.tester {
            select = select
                .join(JoinType::InnerJoin, test_result::Relation::Tester.def())
                .filter(
                    Expr::col((user::Entity, user::Column::Username))
                        .ilike(format!("%{}%", tester)),
                );
        }

        if let ConfigurationFilter::Exact { browser, os } = configuration {
            select = select
                .filter(Expr::cust_with_values("LOWER(browser) = $1", [browser]))
                .filter(Expr::cust_with_values("LOWER(os) = $1", [os]));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test results: {}", e)))?;

        let results = select
            .order_by_desc(test_result::Column::ExecutedAt)
            .order_by_desc(test_result::Column::Id)
            .offset(pagination.offset())
            .limit(u64::from(pagination.clamped_page_size()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test results: {}", e)))?;

        Ok((results, total))
    }
}
