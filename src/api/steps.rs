//! Test step API handlers.
//!
//! The create endpoint takes an array of step payloads and atomically
//! replaces the case's entire step collection with it. The list endpoint
//! returns a bare array (no pagination envelope): a case's steps are a
//! single authored unit.

use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{StepItem, TestStepResponse};

/// List a case's steps in ascending order.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps",
    tag = "Test Steps",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    responses(
        (status = 200, description = "Steps ordered by order", body = [TestStepResponse]),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn list_steps(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let steps = pool.list_steps(case_id).await?;
    let response: Vec<TestStepResponse> = steps.into_iter().map(TestStepResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Replace the case's step collection with the submitted array.
///
/// All-or-nothing: the first invalid item aborts the call and leaves the
/// previous steps untouched.
#[utoipa::path(
    post,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/teststeps",
    tag = "Test Steps",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    request_body = Vec<StepItem>,
    responses(
        (status = 201, description = "The new step generation", body = [TestStepResponse]),
        (status = 400, description = "Invalid item in the batch"),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn create_steps(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<Vec<StepItem>>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let items = body.into_inner();
    let steps = pool.replace_steps(case_id, &items).await?;

    info!(
        case_id = %case_id,
        count = steps.len(),
        user = %auth.user.username,
        "Step generation replaced"
    );

    let response: Vec<TestStepResponse> = steps.into_iter().map(TestStepResponse::from).collect();
    Ok(HttpResponse::Created().json(response))
}

/// Configure test step routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/testplans/{plan_id}/testcases/{case_id}/teststeps")
            .route(web::get().to(list_steps))
            .route(web::post().to(create_steps)),
    );
}
