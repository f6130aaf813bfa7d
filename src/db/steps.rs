//! Database queries for test steps, including the generation reconciler.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::test_step::{self, ActiveModel, Entity as TestStep};
use crate::error::{AppError, AppResult};
use crate::models::StepItem;

use super::{map_batch_insert_err, map_unique_err, validate_order, DbPool};

impl DbPool {
    /// List a case's steps in ascending order.
    pub async fn list_steps(&self, case_id: Uuid) -> AppResult<Vec<test_step::Model>> {
        let steps = TestStep::find()
            .filter(test_step::Column::CaseId.eq(case_id))
            .order_by_asc(test_step::Column::Order)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test steps: {}", e)))?;

        Ok(steps)
    }

    /// Replace the case's entire step generation with `items`.
    ///
    /// Runs as one transaction: the old generation is deleted, then items
    /// are validated and inserted one at a time. The first invalid item
    /// aborts the call and the rollback restores the old generation, so
    /// the observable effect is strictly all-or-nothing. Submitted order
    /// values are retained as-is (not re-numbered, need not be contiguous).
    pub async fn replace_steps(
        &self,
        case_id: Uuid,
        items: &[StepItem],
    ) -> AppResult<Vec<test_step::Model>> {
        // Dropping the transaction without commit (any early return below)
        // rolls everything back.
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        TestStep::delete_many()
            .filter(test_step::Column::CaseId.eq(case_id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to clear step generation: {}", e)))?;

        let mut created = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let order = validate_order(index, item.order)?;

            let model = ActiveModel {
                id: Set(Uuid::now_v7()),
                case_id: Set(case_id),
                order: Set(order),
                action: Set(item.action.clone()),
                expected_result: Set(item.expected_result.clone()),
            };

            let inserted = model
                .insert(&txn)
                .await
                .map_err(|e| map_batch_insert_err(e, index))?;
            created.push(inserted);
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit step generation: {}", e)))?;

        Ok(created)
    }

    /// Insert a single step directly (seed/test helper).
    ///
    /// Unlike [`DbPool::replace_steps`] this does not touch the existing
    /// generation; a duplicate order surfaces the unique constraint.
    pub async fn insert_step(
        &self,
        case_id: Uuid,
        order: i32,
        action: &str,
        expected_result: &str,
    ) -> AppResult<test_step::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            case_id: Set(case_id),
            order: Set(order),
            action: Set(action.to_string()),
            expected_result: Set(expected_result.to_string()),
        };

        model.insert(self.connection()).await.map_err(|e| {
            map_unique_err(e, "A step with this order already exists for the case")
        })
    }
}
