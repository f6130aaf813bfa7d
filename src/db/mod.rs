//! Database module providing connection management, migrations, and queries.
//!
//! All queries are methods on [`DbPool`], grouped per aggregate in the
//! submodules. Generation-replacing writes (steps, result steps,
//! attachments) each run inside a single transaction so a concurrent
//! reader never observes a parent with a half-replaced child set.

pub mod attachments;
pub mod cases;
pub mod plans;
pub mod result_steps;
pub mod results;
pub mod steps;
pub mod users;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper around SeaORM's `DatabaseConnection`.
#[derive(Clone)]
pub struct DbPool {
    conn: Arc<DatabaseConnection>,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to database: {}", e)))?;

        Ok(DbPool {
            conn: Arc::new(conn),
        })
    }

    /// Get access to the underlying connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(self.connection(), None)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}

/// Validate the `order` value of one batch item.
///
/// `order` is the only required field of a batch item; it must be a
/// positive integer.
pub(crate) fn validate_order(index: usize, order: Option<i32>) -> AppResult<i32> {
    let order = order.ok_or_else(|| {
        AppError::batch_item(index, "order", "missing required field 'order'")
    })?;
    if order < 1 {
        return Err(AppError::batch_item(
            index,
            "order",
            format!("order must be a positive integer, got {order}"),
        ));
    }
    Ok(order)
}

/// Map an insert failure for batch item `index` to a caller-facing error.
pub(crate) fn map_batch_insert_err(e: DbErr, index: usize) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::batch_item(
            index,
            "order",
            "duplicate order value within the submission",
        ),
        _ => AppError::Database(format!("Failed to insert batch item {index}: {e}")),
    }
}

/// Map an insert failure for a directly created row.
pub(crate) fn map_unique_err(e: DbErr, message: &str) -> AppError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::InvalidInput(message.to_string()),
        _ => AppError::Database(e.to_string()),
    }
}
