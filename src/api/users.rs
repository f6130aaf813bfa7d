//! Read-only users API: tester identities.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{Pagination, PaginationParams, UserListResponse, UserResponse};

/// List users with pagination, ordered by username.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    params(
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("page_size" = Option<u32>, Query, description = "Rows per page (default 10, max 100)")
    ),
    responses(
        (status = 200, description = "Paginated users", body = UserListResponse)
    )
)]
pub async fn list_users(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    pagination: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let (users, total) = pool.list_users(&pagination).await?;

    Ok(HttpResponse::Ok().json(UserListResponse {
        results: users.into_iter().map(UserResponse::from).collect(),
        pagination: Pagination::new(&pagination, total),
    }))
}

/// Retrieve a user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn get_user(
    _auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = pool.get_user(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Configure user routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::get().to(list_users)))
        .service(web::resource("/users/{user_id}").route(web::get().to(get_user)));
}
