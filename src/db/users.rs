//! Database queries for users (tester identities).

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::user::{self, ActiveModel, Entity as User};
use crate::error::{AppError, AppResult};
use crate::models::PaginationParams;

use super::{map_unique_err, DbPool};

impl DbPool {
    /// Insert a new user.
    pub async fn insert_user(&self, username: &str, email: Option<&str>) -> AppResult<user::Model> {
        let model = ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(username.to_string()),
            email: Set(email.map(str::to_string)),
            created_at: Set(Utc::now()),
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| map_unique_err(e, "Username already taken"))
    }

    /// Get a user by ID, or NotFound.
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<user::Model> {
        User::find_by_id(user_id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("User {}", user_id)))
    }

    /// Look up a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> AppResult<Option<user::Model>> {
        let result = User::find()
            .filter(user::Column::Username.eq(username))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get user: {}", e)))?;

        Ok(result)
    }

    /// List users with pagination, ordered by username.
    pub async fn list_users(
        &self,
        pagination: &PaginationParams,
    ) -> AppResult<(Vec<user::Model>, u64)> {
        let select = User::find();

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count users: {}", e)))?;

        let users = select
            .order_by_asc(user::Column::Username)
            .offset(pagination.offset())
            .limit(u64::from(pagination.clamped_page_size()))
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))?;

        Ok((users, total))
    }
}
