//! Response types for the read-only users surface.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Pagination;
use crate::entity::user;

/// Tester identity.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
}

impl From<user::Model> for UserResponse {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
        }
    }
}

/// Paginated user list.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub results: Vec<UserResponse>,
    pub pagination: Pagination,
}
