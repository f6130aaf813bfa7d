//! Test result API handlers.

use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::results::{NewTestResult, ResultChanges, ResultScope};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CreateTestResultRequest, Pagination, PaginationParams, ResultFilter, TestResultListResponse,
    TestResultResponse, UpdateTestResultRequest,
};

/// List every result recorded under a plan.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testresults",
    tag = "Test Results",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case" = Option<String>, Query, description = "Substring match on the case title"),
        ("result" = Option<String>, Query, description = "Exact result match"),
        ("tester" = Option<String>, Query, description = "Substring match on the tester username"),
        ("configuration" = Option<String>, Query, description = "Composite \"browser on os\" filter"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("page_size" = Option<u32>, Query, description = "Rows per page (default 10, max 100)")
    ),
    responses(
        (status = 200, description = "Paginated results", body = TestResultListResponse),
        (status = 404, description = "Unknown plan")
    )
)]
pub async fn list_plan_results(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    filter: web::Query<ResultFilter>,
    pagination: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let plan_id = path.into_inner();
    pool.get_plan(plan_id).await?;

    let (results, total) = pool
        .list_results(ResultScope::Plan(plan_id), &filter, &pagination)
        .await?;

    Ok(HttpResponse::Ok().json(TestResultListResponse {
        results: results.into_iter().map(TestResultResponse::from).collect(),
        pagination: Pagination::new(&pagination, total),
    }))
}

/// List a case's results.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults",
    tag = "Test Results",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("case" = Option<String>, Query, description = "Substring match on the case title"),
        ("result" = Option<String>, Query, description = "Exact result match"),
        ("tester" = Option<String>, Query, description = "Substring match on the tester username"),
        ("configuration" = Option<String>, Query, description = "Composite \"browser on os\" filter"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("page_size" = Option<u32>, Query, description = "Rows per page (default 10, max 100)")
    ),
    responses(
        (status = 200, description = "Paginated results", body = TestResultListResponse),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn list_case_results(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
    filter: web::Query<ResultFilter>,
    pagination: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let (results, total) = pool
        .list_results(ResultScope::Case(case_id), &filter, &pagination)
        .await?;

    Ok(HttpResponse::Ok().json(TestResultListResponse {
        results: results.into_iter().map(TestResultResponse::from).collect(),
        pagination: Pagination::new(&pagination, total),
    }))
}

/// Record a test result for a case.
///
/// The tester defaults to the authenticated caller; `executed_at` is
/// stamped here and never changes afterwards.
#[utoipa::path(
    post,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults",
    tag = "Test Results",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    request_body = CreateTestResultRequest,
    responses(
        (status = 201, description = "Created", body = TestResultResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn create_result(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CreateTestResultRequest>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let body = body.into_inner();
    let result = pool
        .insert_result(NewTestResult {
            case_id,
            result: body.result,
            browser: body.browser,
            os: body.os,
            tester_id: body.tester.unwrap_or(auth.user.id),
        })
        .await?;

    info!(
        result_id = %result.id,
        case_id = %case_id,
        user = %auth.user.username,
        "Test result recorded"
    );

    Ok(HttpResponse::Created().json(TestResultResponse::from(result)))
}

/// Retrieve a test result.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}",
    tag = "Test Results",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id")
    ),
    responses(
        (status = 200, description = "The test result", body = TestResultResponse),
        (status = 404, description = "Unknown plan, case or result")
    )
)]
pub async fn get_result(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;
    let result = pool.get_result_in_case(case_id, result_id).await?;

    Ok(HttpResponse::Ok().json(TestResultResponse::from(result)))
}

/// Update a test result (PUT and PATCH; absent fields are left unchanged).
#[utoipa::path(
    put,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}",
    tag = "Test Results",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id")
    ),
    request_body = UpdateTestResultRequest,
    responses(
        (status = 200, description = "Updated", body = TestResultResponse),
        (status = 404, description = "Unknown plan, case or result")
    )
)]
pub async fn update_result(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
    body: web::Json<UpdateTestResultRequest>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;

    let body = body.into_inner();
    let result = pool
        .update_result(
            case_id,
            result_id,
            ResultChanges {
                result: body.result,
                browser: body.browser,
                os: body.os,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(TestResultResponse::from(result)))
}

/// Delete a test result and its executed steps.
#[utoipa::path(
    delete,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}",
    tag = "Test Results",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id"),
        ("result_id" = Uuid, Path, description = "Result id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown plan, case or result")
    )
)]
pub async fn delete_result(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id, result_id) = path.into_inner();
    pool.get_case_in_plan(plan_id, case_id).await?;
    pool.delete_result(case_id, result_id).await?;

    info!(result_id = %result_id, user = %auth.user.username, "Test result deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure test result routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/testplans/{plan_id}/testresults").route(web::get().to(list_plan_results)),
    )
    .service(
        web::resource("/testplans/{plan_id}/testcases/{case_id}/testresults")
            .route(web::get().to(list_case_results))
            .route(web::post().to(create_result)),
    )
    .service(
        web::resource("/testplans/{plan_id}/testcases/{case_id}/testresults/{result_id}")
            .route(web::get().to(get_result))
            .route(web::put().to(update_result))
            .route(web::patch().to(update_result))
            .route(web::delete().to(delete_result)),
    );
}
