//! User entity model and DTOs.
//!
//! A single `users` table holds all three roles (admin, worker, citizen);
//! the location and workload columns are only meaningful for workers.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use civiq_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    /// `"admin"`, `"worker"`, or `"user"` (citizen).
    pub role: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    /// `"Free"` or `"Busy"`, derived from `active_tasks`.
    pub workload: String,
    pub active_tasks: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// Defaults to `"user"` when absent.
    pub role: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

/// Worker listing row: user fields plus the live assigned-complaint count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkerSummary {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub workload: String,
    pub active_tasks: i32,
    /// Complaints currently assigned or in progress for this worker.
    pub open_complaints: i64,
}
