//! Domain models: request/response types, enumerations, filters.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod attachment;
pub mod case;
pub mod enums;
pub mod filters;
pub mod plan;
pub mod result;
pub mod result_step;
pub mod step;
pub mod user;

// Re-export commonly used types
pub use attachment::{ResultStepAttachmentResponse, StepAttachmentResponse};
pub use case::{CreateTestCaseRequest, TestCaseListResponse, TestCaseResponse, UpdateTestCaseRequest};
pub use enums::{Browser, CaseStatus, Os, PlanStatus, StepOutcome, Verdict};
pub use filters::{CaseFilter, ConfigurationFilter, PlanFilter, ResultFilter};
pub use plan::{CreateTestPlanRequest, TestPlanListResponse, TestPlanResponse, UpdateTestPlanRequest};
pub use result::{CreateTestResultRequest, TestResultListResponse, TestResultResponse, UpdateTestResultRequest};
pub use result_step::{ResultStepItem, TestResultStepResponse};
pub use step::{StepItem, TestStepResponse};
pub use user::{UserListResponse, UserResponse};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on rows per page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Calculate the offset for database queries.
    pub fn offset(&self) -> u64 {
        let page = self.page.unwrap_or(1).max(1);
        u64::from(page - 1) * u64::from(self.clamped_page_size())
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn clamped_page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// The effective page number (1-based).
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(params: &PaginationParams, total: u64) -> Self {
        let page_size = params.clamped_page_size();
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(u64::from(page_size)) as u32
        };
        Self {
            page: params.page(),
            page_size,
            total,
            total_pages,
        }
    }
}
