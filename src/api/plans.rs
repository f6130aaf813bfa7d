//! Test plan API handlers.

use actix_web::{web, HttpResponse};
use tracing::info;
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::plans::{NewTestPlan, PlanChanges};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CreateTestPlanRequest, Pagination, PaginationParams, PlanFilter, TestPlanListResponse,
    TestPlanResponse, UpdateTestPlanRequest,
};

/// List test plans with filtering and pagination, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/testplans",
    tag = "Test Plans",
    params(
        ("title" = Option<String>, Query, description = "Substring title match, case-insensitive"),
        ("status" = Option<String>, Query, description = "Exact status match"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("page_size" = Option<u32>, Query, description = "Rows per page (default 10, max 100)")
    ),
    responses(
        (status = 200, description = "Paginated test plans", body = TestPlanListResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
pub async fn list_plans(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    filter: web::Query<PlanFilter>,
    pagination: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let (plans, total) = pool.list_plans(&filter, &pagination).await?;

    Ok(HttpResponse::Ok().json(TestPlanListResponse {
        results: plans.into_iter().map(TestPlanResponse::from).collect(),
        pagination: Pagination::new(&pagination, total),
    }))
}

/// Create a test plan.
#[utoipa::path(
    post,
    path = "/api/v1/testplans",
    tag = "Test Plans",
    request_body = CreateTestPlanRequest,
    responses(
        (status = 201, description = "Created", body = TestPlanResponse),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_plan(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestPlanRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let plan = pool
        .insert_plan(NewTestPlan {
            title: body.title,
            description: body.description,
            status: body.status.unwrap_or_default(),
        })
        .await?;

    info!(plan_id = %plan.id, user = %auth.user.username, "Test plan created");

    Ok(HttpResponse::Created().json(TestPlanResponse::from(plan)))
}

/// Retrieve a test plan.
#[utoipa::path(
    get,
    path = "/api/v1/testplans/{plan_id}",
    tag = "Test Plans",
    params(("plan_id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 200, description = "The test plan", body = TestPlanResponse),
        (status = 404, description = "Unknown plan")
    )
)]
pub async fn get_plan(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let plan = pool.get_plan(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TestPlanResponse::from(plan)))
}

/// Update a test plan (PUT and PATCH; absent fields are left unchanged).
#[utoipa::path(
    put,
    path = "/api/v1/testplans/{plan_id}",
    tag = "Test Plans",
    params(("plan_id" = Uuid, Path, description = "Plan id")),
    request_body = UpdateTestPlanRequest,
    responses(
        (status = 200, description = "Updated", body = TestPlanResponse),
        (status = 404, description = "Unknown plan")
    )
)]
pub async fn update_plan(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateTestPlanRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let plan = pool
        .update_plan(
            path.into_inner(),
            PlanChanges {
                title: body.title,
                description: body.description,
                status: body.status,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(TestPlanResponse::from(plan)))
}

/// Delete a test plan and everything beneath it.
#[utoipa::path(
    delete,
    path = "/api/v1/testplans/{plan_id}",
    tag = "Test Plans",
    params(("plan_id" = Uuid, Path, description = "Plan id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown plan")
    )
)]
pub async fn delete_plan(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let plan_id = path.into_inner();
    pool.delete_plan(plan_id).await?;

    info!(plan_id = %plan_id, user = %auth.user.username, "Test plan deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure test plan routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/testplans")
            .route(web::get().to(list_plans))
            .route(web::post().to(create_plan)),
    )
    .service(
        web::resource("/testplans/{plan_id}")
            .route(web::get().to(get_plan))
            .route(web::put().to(update_plan))
            .route(web::patch().to(update_plan))
            .route(web::delete().to(delete_plan)),
    );
}
