//! Request/response types for test cases.
//!
//! `latest_result` and `executed_at` are projections over the case's
//! result history, recomputed on every read. They are deliberately NOT
//! columns on `test_cases`; keeping them out of the stored row is what
//! makes result writes and case reads impossible to desynchronize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{CaseStatus, Verdict};
use super::Pagination;
use crate::entity::{test_case, test_result};

/// Payload for creating a test case.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestCaseRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<CaseStatus>,
}

/// Payload for updating a test case. Absent fields are left unchanged.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestCaseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
}

/// Test case representation with derived execution fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestCaseResponse {
    pub id: Uuid,
    /// Owning plan id.
    pub plan: Uuid,
    pub title: String,
    pub description: String,
    pub status: CaseStatus,
    /// Verdict of the most recently executed result, if any.
    pub latest_result: Option<Verdict>,
    /// Execution time of the most recent result, if any.
    pub executed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TestCaseResponse {
    /// Build a response from a stored case plus its projected latest result.
    pub fn project(case: test_case::Model, latest: Option<&test_result::Model>) -> Self {
        Self {
            id: case.id,
            plan: case.plan_id,
            title: case.title,
            description: case.description,
            status: CaseStatus::parse(&case.status).unwrap_or_default(),
            latest_result: latest.map(|r| Verdict::parse(&r.result).unwrap_or_default()),
            executed_at: latest.map(|r| r.executed_at),
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Paginated test case list.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestCaseListResponse {
    pub results: Vec<TestCaseResponse>,
    pub pagination: Pagination,
}
