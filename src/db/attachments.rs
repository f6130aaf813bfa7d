//! Database queries for step and result-step attachments.
//!
//! Attachment batches reference their parent step by its `order` number,
//! not its surrogate id: clients assemble batches against the generation
//! they authored, before internal ids are known. Resolution happens
//! inside the same transaction that replaces the attachment generation,
//! so the ids substituted are the ones live at commit time.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entity::test_result_step::{self, Entity as TestResultStep};
use crate::entity::test_result_step_attachment::{
    self, Entity as TestResultStepAttachment,
};
use crate::entity::test_step::{self, Entity as TestStep};
use crate::entity::test_step_attachment::{self, Entity as TestStepAttachment};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// An attachment to be created, keyed by its parent's order number.
pub struct NewAttachment {
    pub parent_order: i32,
    pub file_key: Option<String>,
    pub file_name: Option<String>,
}

/// Error for an order number with no live child under the parent.
fn unresolved_order(index: usize, order: i32, parent: &str) -> AppError {
    AppError::Validation {
        message: format!("Item {index}: no {parent} with order {order} exists"),
        details: serde_json::json!({ "index": index, "order": order }),
    }
}

impl DbPool {
    /// List all attachments under a case's current step generation.
    pub async fn list_step_attachments(
        &self,
        case_id: Uuid,
    ) -> AppResult<Vec<test_step_attachment::Model>> {
        let step_ids = self.step_ids_for_case(case_id).await?;

        let attachments = TestStepAttachment::find()
            .filter(test_step_attachment::Column::StepId.is_in(step_ids))
            .order_by_asc(test_step_attachment::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list step attachments: {}", e)))?;

        Ok(attachments)
    }

    /// Get one step attachment scoped to a case, or NotFound.
    pub async fn get_step_attachment_in_case(
        &self,
        case_id: Uuid,
        attachment_id: Uuid,
    ) -> AppResult<test_step_attachment::Model> {
        let step_ids = self.step_ids_for_case(case_id).await?;

        TestStepAttachment::find_by_id(attachment_id)
            .filter(test_step_attachment::Column::StepId.is_in(step_ids))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get step attachment: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Attachment {}", attachment_id)))
    }

    /// Resolve step order numbers to step ids within a case's current
    /// generation. Fails on the first order with no live step.
    pub async fn resolve_step_orders(
        &self,
        case_id: Uuid,
        orders: &[i32],
    ) -> AppResult<HashMap<i32, Uuid>> {
        let steps = self.list_steps(case_id).await?;
        let by_order: HashMap<i32, Uuid> = steps.iter().map(|s| (s.order, s.id)).collect();

        for (index, order) in orders.iter().enumerate() {
            if !by_order.contains_key(order) {
                return Err(unresolved_order(index, *order, "step"));
            }
        }

        Ok(by_order)
    }

    /// Replace the attachment generation scoped to a case.
    ///
    /// One transaction: resolve each item's order against the case's live
    /// steps, delete every existing attachment under those steps, insert
    /// the new batch. An unresolved order aborts the whole batch.
    pub async fn replace_step_attachments(
        &self,
        case_id: Uuid,
        items: &[NewAttachment],
    ) -> AppResult<Vec<test_step_attachment::Model>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let steps = TestStep::find()
            .filter(test_step::Column::CaseId.eq(case_id))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to load step generation: {}", e)))?;
        let by_order: HashMap<i32, Uuid> = steps.iter().map(|s| (s.order, s.id)).collect();
        let step_ids: Vec<Uuid> = steps.iter().map(|s| s.id).collect();

        TestStepAttachment::delete_many()
            .filter(test_step_attachment::Column::StepId.is_in(step_ids))
            .exec(&txn)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to clear attachment generation: {}", e))
            })?;

        let mut created = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let step_id = *by_order
                .get(&item.parent_order)
                .ok_or_else(|| unresolved_order(index, item.parent_order, "step"))?;

            let model = test_step_attachment::ActiveModel {
                id: Set(Uuid::now_v7()),
                step_id: Set(step_id),
                file_key: Set(item.file_key.clone()),
                file_name: Set(item.file_name.clone()),
                created_at: Set(Utc::now()),
            };

            let inserted = model.insert(&txn).await.map_err(|e| {
                AppError::Database(format!("Failed to insert attachment {index}: {e}"))
            })?;
            created.push(inserted);
        }

        txn.commit().await.map_err(|e| {
            AppError::Database(format!("Failed to commit attachment generation: {}", e))
        })?;

        Ok(created)
    }

    /// List all attachments under a result's current step generation.
    pub async fn list_result_step_attachments(
        &self,
        result_id: Uuid,
    ) -> AppResult<Vec<test_result_step_attachment::Model>> {
        let step_ids = self.result_step_ids_for_result(result_id).await?;

        let attachments = TestResultStepAttachment::find()
            .filter(test_result_step_attachment::Column::ResultStepId.is_in(step_ids))
            .order_by_asc(test_result_step_attachment::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to list result step attachments: {}", e))
            })?;

        Ok(attachments)
    }

    /// Get one result-step attachment scoped to a result, or NotFound.
    pub async fn get_result_step_attachment_in_result(
        &self,
        result_id: Uuid,
        attachment_id: Uuid,
    ) -> AppResult<test_result_step_attachment::Model> {
        let step_ids = self.result_step_ids_for_result(result_id).await?;

        TestResultStepAttachment::find_by_id(attachment_id)
            .filter(test_result_step_attachment::Column::ResultStepId.is_in(step_ids))
            .one(self.connection())
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to get result step attachment: {}", e))
            })?
            .ok_or_else(|| AppError::NotFound(format!("Attachment {}", attachment_id)))
    }

    /// Resolve result-step order numbers to ids within a result's current
    /// generation. Fails on the first order with no live result step.
    pub async fn resolve_result_step_orders(
        &self,
        result_id: Uuid,
        orders: &[i32],
    ) -> AppResult<HashMap<i32, Uuid>> {
        let steps = self.list_result_steps(result_id).await?;
        let by_order: HashMap<i32, Uuid> = steps.iter().map(|s| (s.order, s.id)).collect();

        for (index, order) in orders.iter().enumerate() {
            if !by_order.contains_key(order) {
                return Err(unresolved_order(index, *order, "result step"));
            }
        }

        Ok(by_order)
    }

    /// Replace the attachment generation scoped to a result.
    ///
    /// Mirrors [`DbPool::replace_step_attachments`] at the result level.
    pub async fn replace_result_step_attachments(
        &self,
        result_id: Uuid,
        items: &[NewAttachment],
    ) -> AppResult<Vec<test_result_step_attachment::Model>> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let steps = TestResultStep::find()
            .filter(test_result_step::Column::ResultId.eq(result_id))
            .all(&txn)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to load result step generation: {}", e))
            })?;
        let by_order: HashMap<i32, Uuid> = steps.iter().map(|s| (s.order, s.id)).collect();
        let step_ids: Vec<Uuid> = steps.iter().map(|s| s.id).collect();

        TestResultStepAttachment::delete_many()
            .filter(test_result_step_attachment::Column::ResultStepId.is_in(step_ids))
            .exec(&txn)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to clear attachment generation: {}", e))
            })?;

        let mut created = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let result_step_id = *by_order
                .get(&item.parent_order)
                .ok_or_else(|| unresolved_order(index, item.parent_order, "result step"))?;

            let model = test_result_step_attachment::ActiveModel {
                id: Set(Uuid::now_v7()),
                result_step_id: Set(result_step_id),
                file_key: Set(item.file_key.clone()),
                file_name: Set(item.file_name.clone()),
                created_at: Set(Utc::now()),
            };

            let inserted = model.insert(&txn).await.map_err(|e| {
                AppError::Database(format!("Failed to insert attachment {index}: {e}"))
            })?;
            created.push(inserted);
        }

        txn.commit().await.map_err(|e| {
            AppError::Database(format!("Failed to commit attachment generation: {}", e))
        })?;

        Ok(created)
    }

    async fn step_ids_for_case(&self, case_id: Uuid) -> AppResult<Vec<Uuid>> {
        let steps = TestStep::find()
            .filter(test_step::Column::CaseId.eq(case_id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load steps: {}", e)))?;
        Ok(steps.into_iter().map(|s| s.id).collect())
    }

    async fn result_step_ids_for_result(&self, result_id: Uuid) -> AppResult<Vec<Uuid>> {
        let steps = TestResultStep::find()
            .filter(test_result_step::Column::ResultId.eq(result_id))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to load result steps: {}", e)))?;
        Ok(steps.into_iter().map(|s| s.id).collect())
    }
}
