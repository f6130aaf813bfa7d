//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Planboard Server",
        version = "0.3.0",
        description = "API server for managing test plans, cases, ordered steps, execution results and attachments"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Test plan endpoints
        api::plans::list_plans,
        api::plans::create_plan,
        api::plans::get_plan,
        api::plans::update_plan,
        api::plans::delete_plan,
        // Test case endpoints
        api::cases::list_cases,
        api::cases::create_case,
        api::cases::get_case,
        api::cases::update_case,
        api::cases::delete_case,
        // Test step endpoints
        api::steps::list_steps,
        api::steps::create_steps,
        // Test result endpoints
        api::results::list_plan_results,
        api::results::list_case_results,
        api::results::create_result,
        api::results::get_result,
        api::results::update_result,
        api::results::delete_result,
        // Result step endpoints
        api::result_steps::list_result_steps,
        api::result_steps::create_result_steps,
        // Attachment endpoints
        api::attachments::list_step_attachments,
        api::attachments::create_step_attachments,
        api::attachments::download_step_attachment,
        api::attachments::list_result_step_attachments,
        api::attachments::create_result_step_attachments,
        api::attachments::download_result_step_attachment,
        // User endpoints
        api::users::list_users,
        api::users::get_user,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Pagination,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Enumerations
            models::PlanStatus,
            models::CaseStatus,
            models::Verdict,
            models::Browser,
            models::Os,
            models::StepOutcome,
            // Test plans
            models::CreateTestPlanRequest,
            models::UpdateTestPlanRequest,
            models::TestPlanResponse,
            models::TestPlanListResponse,
            // Test cases
            models::CreateTestCaseRequest,
            models::UpdateTestCaseRequest,
            models::TestCaseResponse,
            models::TestCaseListResponse,
            // Test steps
            models::StepItem,
            models::TestStepResponse,
            // Test results
            models::CreateTestResultRequest,
            models::UpdateTestResultRequest,
            models::TestResultResponse,
            models::TestResultListResponse,
            // Result steps
            models::ResultStepItem,
            models::TestResultStepResponse,
            // Attachments
            models::StepAttachmentResponse,
            models::ResultStepAttachmentResponse,
            // Users
            models::UserResponse,
            models::UserListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Test Plans", description = "Test plan management"),
        (name = "Test Cases", description = "Test cases within a plan"),
        (name = "Test Steps", description = "Ordered steps of a case, replaced as a whole"),
        (name = "Test Results", description = "Execution results of a case"),
        (name = "Test Result Steps", description = "Executed steps of a result, replaced as a whole"),
        (name = "Attachments", description = "File attachments for steps and result steps"),
        (name = "Users", description = "Tester identities")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add bearer token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
