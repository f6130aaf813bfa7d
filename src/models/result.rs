//! Request/response types for test results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{Browser, Os, Verdict};
use super::Pagination;
use crate::entity::test_result;

/// Payload for recording a test result.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTestResultRequest {
    #[serde(default)]
    pub result: Verdict,
    #[serde(default)]
    pub browser: Browser,
    #[serde(default)]
    pub os: Os,
    /// Tester user id; defaults to the authenticated caller.
    pub tester: Option<Uuid>,
}

/// Payload for updating a test result. Absent fields are left unchanged.
/// `executed_at` is set once at creation and cannot be updated.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTestResultRequest {
    pub result: Option<Verdict>,
    pub browser: Option<Browser>,
    pub os: Option<Os>,
}

/// Test result representation.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestResultResponse {
    pub id: Uuid,
    /// Owning case id.
    pub case: Uuid,
    pub result: Verdict,
    pub browser: Browser,
    pub os: Os,
    /// Derived `"{browser} on {os}"` execution environment.
    pub configuration: String,
    pub tester: Uuid,
    pub executed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_result::Model> for TestResultResponse {
    fn from(m: test_result::Model) -> Self {
        Self {
            id: m.id,
            case: m.case_id,
            result: Verdict::parse(&m.result).unwrap_or_default(),
            browser: Browser::parse(&m.browser).unwrap_or_default(),
            os: Os::parse(&m.os).unwrap_or_default(),
            configuration: format!("{} on {}", m.browser, m.os),
            tester: m.tester_id,
            executed_at: m.executed_at,
            updated_at: m.updated_at,
        }
    }
}

/// Paginated test result list.
#[derive(Debug, Serialize, ToSchema)]
pub struct TestResultListResponse {
    pub results: Vec<TestResultResponse>,
    pub pagination: Pagination,
}
