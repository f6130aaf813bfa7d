//! Response types for step and result-step attachments.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{test_result_step_attachment, test_step_attachment};

/// Attachment on an authored test step.
#[derive(Debug, Serialize, ToSchema)]
pub struct StepAttachmentResponse {
    pub id: Uuid,
    /// Owning step id.
    pub step: Uuid,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<test_step_attachment::Model> for StepAttachmentResponse {
    fn from(m: test_step_attachment::Model) -> Self {
        Self {
            id: m.id,
            step: m.step_id,
            file_name: m.file_name,
            created_at: m.created_at,
        }
    }
}

/// Attachment on an executed result step.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultStepAttachmentResponse {
    pub id: Uuid,
    /// Owning result step id.
    pub result_step: Uuid,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<test_result_step_attachment::Model> for ResultStepAttachmentResponse {
    fn from(m: test_result_step_attachment::Model) -> Self {
        Self {
            id: m.id,
            result_step: m.result_step_id,
            file_name: m.file_name,
            created_at: m.created_at,
        }
    }
}
