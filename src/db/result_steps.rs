//! Database queries for executed result steps.
//!
//! Same generation-replacement contract as authored steps, keyed by
//! (result_id, order) instead of (case_id, order).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::test_result_step::{self, ActiveModel, Entity as TestResultStep};
use crate::error::{AppError, AppResult};
use crate::models::ResultStepItem;

use super::{map_batch_insert_err, validate_order, DbPool};

impl DbPool {
    /// List a result's executed steps in ascending order.
    pub async fn list_result_steps(
        &self,
        result_id: Uuid,
    ) -> AppResult<Vec<test_result_step::Model>> {
        let steps = TestResultStep::find()
            .filter(test_result_step::Column::ResultId.eq(result_id))
            .order_by_asc(test_result_step::Column::Order)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list result steps: {}", e)))?;

        Ok(steps)
    }

    /// Replace the result's entire step generation with `items`.
    ///
    /// See [`DbPool::replace_steps`] for the transactional contract; it
    /// applies identically here.
    pub async fn replace_result_steps(
        &self,
        result_id: Uuid,
        items: &[ResultStepItem],
    ) -> AppResult<Vec<test_result_step::Model>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        TestResultStep::delete_many()
            .filter(test_result_step::Column::ResultId.eq(result_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to clear result step generation: {}", e))
            })?;

        let mut created = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let order = validate_order(index, item.order)?;

            let model = ActiveModel {
                id: Set(Uuid::now_v7()),
                result_id: Set(result_id),
                step_id: Set(item.step),
                order: Set(order),
                action: Set(item.action.clone()),
                expected_result: Set(item.expected_result.clone()),
                status: Set(item.status.as_str().to_string()),
                comment: Set(item.comment.clone()),
            };

            let inserted = model
                .insert(&txn)
                .await
                .map_err(|e| map_batch_insert_err(e, index))?;
            created.push(inserted);
        }

        txn.commit().await.map_err(|e| {
            AppError::Database(format!("Failed to commit result step generation: {}", e))
        })?;

        Ok(created)
    }
}
