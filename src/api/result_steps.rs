//! Executed result step API handlers.
//!
//! Same replace-on-write contract as authored steps, scoped to a result.

use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{ResultStepItem, TestResultStepResponse};

/// List a result's executed steps in ascending order.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps",
    tag = "Test Result Steps",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id")
    ),
    responses(
        (status = 200, description = "Result steps ordered by order", body = [TestResultStepResponse]),
        (status = 404, description = "Unknown plan, case or result")
    )
)]
pub async fn list_result_steps(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;
    pool.get_result_in_case(case_id, result_id).await?;

    let steps = pool.list_result_steps(result_id).await?;
    let response: Vec<TestResultStepResponse> =
        steps.into_iter().map(TestResultStepResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Replace the result's executed step collection with the submitted array.
#[utoipa::path(
    post,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps",
    tag = "Test Result Steps",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id")
    ),
    request_body = Vec<ResultStepItem>,
    responses(
        (status = 201, description = "The new result step generation", body = [TestResultStepResponse]),
        (status = 400, description = "Invalid item in the batch"),
        (status = 404, description = "Unknown plan, case or result")
    )
)]
pub async fn create_result_steps(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    body: web::Json<Vec<ResultStepItem>>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;
    pool.get_result_in_case(case_id, result_id).await?;

    let items = body.into_inner();
    let steps = pool.replace_result_steps(result_id, &items).await?;

    info!(
        result_id = %result_id,
        count = steps.len(),
        user = %auth.user.username,
        "Result step generation replaced"
    );

    let response: Vec<TestResultStepResponse> =
        steps.into_iter().map(TestResultStepResponse::from).collect();
    Ok(HttpResponse::Created().json(response))
}

/// Configure result step routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(
            "/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}/testresultsteps",
        )
        .route(web::get().to(list_result_steps))
        .route(web::post().to(create_result_steps)),
    );
}
