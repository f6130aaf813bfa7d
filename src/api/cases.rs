//! Test case API handlers.
//!
//! Every response carries the derived `latest_result`/`executed_at`
//! fields, projected from the result history on each request.

use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::cases::{CaseChanges, NewTestCase};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CaseFilter, CreateTestCaseRequest, Pagination, PaginationParams, TestCaseListResponse,
    TestCaseResponse, UpdateTestCaseRequest,
};

/// List a plan's test cases with filtering and pagination.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases",
    tag = "Test Cases",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("title" = Option<String>, Query, description = "Substring title match, case-insensitive"),
        ("status" = Option<String>, Query, description = "Exact status match"),
        ("latest_result" = Option<String>, Query, description = "Exact match on the derived latest result"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("page_size" = Option<u32>, Query, description = "Rows per page (default 10, max 100)")
    ),
    responses(
        (status = 200, description = "Paginated test cases", body = TestCaseListResponse),
        (status = 404, description = "Unknown plan")
    )
)]
pub async fn list_cases(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    filter: web::Query<CaseFilter>,
    pagination: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let plan_id = path.into_inner();
    pool.get_plan(plan_id).await?;

    let (cases, total) = pool.list_cases(plan_id, &filter, &pagination).await?;

    // One batched projection query for the whole page.
    let case_ids: Vec<Uuid> = cases.iter().map(|c| c.id).collect();
    let latest = pool.latest_results_for_cases(&case_ids).await?;

    let results = cases
        .into_iter()
        .map(|case| {
            let latest_result = latest.get(&case.id);
            TestCaseResponse::project(case, latest_result)
        })
        .collect();

    Ok(HttpResponse::Ok().json(TestCaseListResponse {
        results,
        pagination: Pagination::new(&pagination, total),
    }))
}

/// Create a test case under a plan.
#[utoipa::path(
    post,
    path = "/api/v1/testplans/{plan_id}/testcases",
    tag = "Test Cases",
    params(("plan_id" = Uuid, Path, description = "Plan id")),
    request_body = CreateTestCaseRequest,
    responses(
        (status = 201, description = "Created", body = TestCaseResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown plan")
    )
)]
pub async fn create_case(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let plan_id = path.into_inner();
    pool.get_plan(plan_id).await?;

    let body = body.into_inner();
    let case = pool
        .insert_case(NewTestCase {
            plan_id,
            title: body.title,
            description: body.description,
            status: body.status.unwrap_or_default(),
        })
        .await?;

    info!(case_id = %case.id, plan_id = %plan_id, user = %auth.user.username, "Test case created");

    // A freshly created case has no result history.
    Ok(HttpResponse::Created().json(TestCaseResponse::project(case, None)))
}

/// Retrieve a test case with its derived execution fields.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}",
    tag = "Test Cases",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    responses(
        (status = 200, description = "The test case", body = TestCaseResponse),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn get_case(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    let case = pool.get_case_in_plan(plan_id, case_id).await?;
    let latest = pool.latest_result_for_case(case_id).await?;

    Ok(HttpResponse::Ok().json(TestCaseResponse::project(case, latest.as_ref())))
}

/// Update a test case (PUT and PATCH; absent fields are left unchanged).
#[utoipa::path(
    put,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}",
    tag = "Test Cases",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    request_body = UpdateTestCaseRequest,
    responses(
        (status = 200, description = "Updated", body = TestCaseResponse),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn update_case(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateTestCaseRequest>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    let body = body.into_inner();

    let case = pool
        .update_case(
            plan_id,
            case_id,
            CaseChanges {
                title: body.title,
                description: body.description,
                status: body.status,
            },
        )
        .await?;
    let latest = pool.latest_result_for_case(case_id).await?;

    Ok(HttpResponse::Ok().json(TestCaseResponse::project(case, latest.as_ref())))
}

/// Delete a test case and everything beneath it.
#[utoipa::path(
    delete,
    path = "/api/v1/testplans/{plan_id}/testcases/{case_id}",
    tag = "Test Cases",
    params(
        ("plan_id" = Uuid, Path, description = "Plan id"),
        ("case_id" = Uuid, Path, description = "Case id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown plan or case")
    )
)]
pub async fn delete_case(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (plan_id, case_id) = path.into_inner();
    pool.delete_case(plan_id, case_id).await?;

    info!(case_id = %case_id, user = %auth.user.username, "Test case deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure test case routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/testplans/{plan_id}/testcases")
            .route(web::get().to(list_cases))
            .route(web::post().to(create_case)),
    )
    .service(
        web::resource("/testplans/{plan_id}/testcases/{case_id}")
            .route(web::get().to(get_case))
            .route(web::put().to(update_case))
            .route(web::patch().to(update_case))
            .route(web::delete().to(delete_case)),
    );
}
