//! Request/response types for test steps.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::test_step;

/// One item of a step batch submission.
///
/// `order` is the only required field; it identifies the step within the
/// case's current generation. Textual fields default to empty.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StepItem {
    pub order: Option<i32>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub expected_result: String,
}

/// Test step representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestStepResponse {
    pub id: Uuid,
    /// Owning case id.
    pub case: Uuid,
    pub order: i32,
    pub action: String,
    pub expected_result: String,
}

impl From<test_step::Model> for TestStepResponse {
    fn from(m: test_step::Model) -> Self {
        Self {
            id: m.id,
            case: m.case_id,
            order: m.order,
            action: m.action,
            expected_result: m.expected_result,
        }
    }
}
