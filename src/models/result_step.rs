//! Request/response types for executed result steps.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::StepOutcome;
use crate::entity::test_result_step;

/// One item of a result-step batch submission.
///
/// Mirrors [`super::StepItem`]: `order` is required and identifies the
/// record within the result's generation; `step` optionally points back
/// at the authored test step this execution came from.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResultStepItem {
    pub order: Option<i32>,
    pub step: Option<Uuid>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub expected_result: String,
    #[serde(default)]
    pub status: StepOutcome,
    #[serde(default)]
    pub comment: String,
}

/// Executed result step representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestResultStepResponse {
    pub id: Uuid,
    /// Owning result id.
    pub result: Uuid,
    /// Originating test step, if it still exists.
    pub step: Option<Uuid>,
    pub order: i32,
    pub action: String,
    pub expected_result: String,
    pub status: StepOutcome,
    pub comment: String,
}

impl From<test_result_step::Model> for TestResultStepResponse {
    fn from(m: test_result_step::Model) -> Self {
        Self {
            id: m.id,
            result: m.result_id,
            step: m.step_id,
            order: m.order,
            action: m.action,
            expected_result: m.expected_result,
            status: StepOutcome::parse(&m.status).unwrap_or_default(),
            comment: m.comment,
        }
    }
}
