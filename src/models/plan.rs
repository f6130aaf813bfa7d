//! Request/response types for test plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::PlanStatus;
use super::Pagination;
use crate::entity::test_plan;

/// Payload for creating a test plan.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestPlanRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<PlanStatus>,
}

/// Payload for updating a test plan. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestPlanRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<PlanStatus>,
}

/// Test plan representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestPlanResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_plan::Model> for TestPlanResponse {
    fn from(m: test_plan::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            status: PlanStatus::parse(&m.status).unwrap_or_default(),
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated test plan list.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestPlanListResponse {
    pub results: Vec<TestPlanResponse>,
    pub pagination: Pagination,
}
